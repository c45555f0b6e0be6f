//! Weekly tiffin plan (`TiffinMenu/*`), one document per day.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::draft::Record;
use crate::error::CoreError;
use crate::types::DocId;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TiffinLine {
    pub name: String,
    pub description: String,
    pub is_veg: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TiffinDay {
    pub id: DocId,
    /// Display label, e.g. "Today" or "Monday".
    pub day: String,
    /// Display date, e.g. "Monday, 14 July".
    pub date: String,
    pub items: Vec<TiffinLine>,
    pub is_special: bool,
    pub special_note: String,
    pub order: i64,
}

impl Record for TiffinDay {
    const COLLECTION: &'static str = "TiffinMenu";
    const SURFACE: &'static str = "tiffin";
    const ORDER_BY: Option<&'static str> = Some("order");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: DocId) {
        self.id = id;
    }

    /// Rows are added blank and named by a later edit, so blank names are
    /// only refused at commit.
    fn validate(&self) -> Result<(), CoreError> {
        if self.items.iter().any(|line| line.name.trim().is_empty()) {
            return Err(CoreError::Validation(format!(
                "Every tiffin item on {} needs a name",
                if self.day.is_empty() { "this day" } else { &self.day }
            )));
        }
        Ok(())
    }
}

impl TiffinDay {
    /// Public form: unnamed rows dropped, the note only on special days.
    /// The stored note survives so re-ticking "special" brings it back.
    pub fn for_display(mut self) -> Self {
        self.items.retain(|line| !line.name.trim().is_empty());
        if !self.is_special {
            self.special_note.clear();
        }
        self
    }
}

/// A seven-day plan starting at `start`, labelled "Today", "Tomorrow", then
/// by weekday, with `order` 1..=7.
pub fn week_starting(start: NaiveDate) -> Vec<TiffinDay> {
    (0..7i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let day = match offset {
                0 => "Today".to_string(),
                1 => "Tomorrow".to_string(),
                _ => date.format("%A").to_string(),
            };
            TiffinDay {
                id: format!("day-{}", offset + 1),
                day,
                date: date.format("%A, %-d %B").to_string(),
                items: sample_lines(offset),
                is_special: offset == 6,
                special_note: if offset == 6 {
                    "Sunday special thali".into()
                } else {
                    String::new()
                },
                order: offset + 1,
            }
        })
        .collect()
}

fn sample_lines(offset: i64) -> Vec<TiffinLine> {
    let sabzi = ["Aloo Gobi", "Bhindi Masala", "Mix Veg", "Paneer Bhurji", "Chole", "Palak Paneer", "Veg Kolhapuri"];
    let sabzi = sabzi[offset as usize % sabzi.len()];
    vec![
        TiffinLine {
            name: "Chapati".into(),
            description: "4 soft wheat chapatis".into(),
            is_veg: true,
        },
        TiffinLine {
            name: sabzi.into(),
            description: "Seasonal sabzi".into(),
            is_veg: true,
        },
        TiffinLine {
            name: "Dal & Rice".into(),
            description: "Tadka dal with steamed rice".into(),
            is_veg: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn week_has_seven_ordered_days() {
        let start = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        let week = week_starting(start);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].day, "Today");
        assert_eq!(week[1].day, "Tomorrow");
        assert_eq!(week[2].day, "Wednesday");
        assert_eq!(week[0].date, "Monday, 14 July");
        assert_eq!(week.iter().map(|d| d.order).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn display_hides_blank_lines_and_stale_note() {
        let day = TiffinDay {
            items: vec![TiffinLine::default()],
            special_note: "left over".into(),
            ..TiffinDay::default()
        }
        .for_display();
        assert!(day.items.is_empty());
        assert!(day.special_note.is_empty());
    }

    #[test]
    fn unnamed_line_blocks_commit() {
        let day = TiffinDay {
            day: "Monday".into(),
            items: vec![TiffinLine::default()],
            ..TiffinDay::default()
        };
        assert_matches!(
            Record::validate(&day),
            Err(CoreError::Validation(reason)) if reason == "Every tiffin item on Monday needs a name"
        );
    }
}
