//! Promotional popups (`Ads/*`) and the visitor-side rotation schedule.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::draft::Record;
use crate::types::DocId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupTheme {
    #[default]
    Orange,
    Blue,
    Green,
    Purple,
    Red,
}

/// Unknown or missing themes fall back to orange instead of failing the load.
fn lenient_theme<'de, D>(deserializer: D) -> Result<PopupTheme, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| serde_json::from_value(serde_json::Value::String(s.to_lowercase())).ok())
        .unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionalPopup {
    pub id: DocId,
    pub title: String,
    pub desc: String,
    /// Free text, e.g. `"$4.99"`.
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    /// Image URL or a single emoji.
    pub img: String,
    #[serde(deserialize_with = "lenient_theme")]
    pub theme: PopupTheme,
}

impl Record for PromotionalPopup {
    const COLLECTION: &'static str = "Ads";
    const SURFACE: &'static str = "popups";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: DocId) {
        self.id = id;
    }

    fn normalize(&mut self) {
        self.discount = self
            .discount
            .filter(|d| d.is_finite())
            .map(|d| d.clamp(0.0, 100.0));
    }
}

// ---------------------------------------------------------------------------
// Rotation schedule
// ---------------------------------------------------------------------------

/// Timing of the offer popup as seen by a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RotationSchedule {
    pub show_after_secs: u64,
    pub rotate_every_secs: u64,
    pub countdown_secs: u64,
}

impl Default for RotationSchedule {
    fn default() -> Self {
        Self {
            show_after_secs: 2,
            rotate_every_secs: 6,
            countdown_secs: 300,
        }
    }
}

impl RotationSchedule {
    /// Offer shown `elapsed` after page load, or `None` while hidden or when
    /// there are no offers.
    pub fn offer_index_at(&self, elapsed: Duration, offers: usize) -> Option<usize> {
        let secs = elapsed.as_secs();
        if offers == 0 || secs < self.show_after_secs {
            return None;
        }
        let step = self.rotate_every_secs.max(1);
        Some(((secs - self.show_after_secs) / step) as usize % offers)
    }

    /// Seconds left on the countdown, which restarts once it reaches zero.
    pub fn countdown_remaining(&self, elapsed: Duration) -> u64 {
        let period = self.countdown_secs.max(1);
        period - elapsed.as_secs() % period
    }
}

/// `m:ss`, e.g. `299` -> `"4:59"`.
pub fn format_countdown(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
