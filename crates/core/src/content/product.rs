//! Product grid (`products/*`).

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::content::validation_message;
use crate::draft::Record;
use crate::error::CoreError;
use crate::types::DocId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pinned {
    Yes,
    #[default]
    No,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Product {
    pub id: DocId,
    pub title: String,
    pub description: String,
    #[validate(custom(function = "not_blank", message = "Product must have an image"))]
    pub photolink: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<Pinned>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl Product {
    pub fn is_pinned(&self) -> bool {
        self.pinned == Some(Pinned::Yes)
    }

    /// Case-insensitive match on title or description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

impl Record for Product {
    const COLLECTION: &'static str = "products";
    const SURFACE: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: DocId) {
        self.id = id;
    }

    fn normalize(&mut self) {
        self.photolink = self.photolink.trim().to_string();
        if self.pinned.is_none() {
            self.pinned = Some(Pinned::No);
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        Validate::validate(self).map_err(|e| CoreError::Validation(validation_message(&e)))
    }
}

/// Pinned products first; relative order otherwise unchanged.
pub fn pinned_first(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by_key(|p| !p.is_pinned());
    products
}
