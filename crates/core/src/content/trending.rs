//! Trending items (`Trending/*`).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::content::validation_message;
use crate::draft::Record;
use crate::error::CoreError;
use crate::types::DocId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendingItem {
    pub id: DocId,
    pub name: String,
    pub price: String,
    pub unit: String,
    pub image: String,
    pub category: String,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: f64,
    pub description: String,
    pub features: Vec<String>,
    pub trending: bool,
    #[validate(range(min = 0.0, max = 100.0, message = "Discount must be between 0 and 100"))]
    pub discount: f64,
}

impl Default for TrendingItem {
    fn default() -> Self {
        Self {
            id: DocId::new(),
            name: String::new(),
            price: String::new(),
            unit: "Per Piece".into(),
            image: String::new(),
            category: String::new(),
            rating: 4.0,
            description: String::new(),
            features: Vec::new(),
            trending: false,
            discount: 0.0,
        }
    }
}

impl Record for TrendingItem {
    const COLLECTION: &'static str = "Trending";
    const SURFACE: &'static str = "trending";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: DocId) {
        self.id = id;
    }

    /// Out-of-range numbers are clamped; blank feature lines are dropped.
    fn normalize(&mut self) {
        if self.rating.is_finite() {
            self.rating = self.rating.clamp(0.0, 5.0);
        }
        if self.discount.is_finite() {
            self.discount = self.discount.clamp(0.0, 100.0);
        }
        self.features.retain(|f| !f.trim().is_empty());
    }

    fn validate(&self) -> Result<(), CoreError> {
        Validate::validate(self).map_err(|e| CoreError::Validation(validation_message(&e)))
    }
}
