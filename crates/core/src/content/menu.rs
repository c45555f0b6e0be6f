//! Menu catalog (`Menu/main`): category name -> ordered list of entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::draft::DocumentShape;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MenuEntry {
    #[serde(default)]
    pub name: String,
    /// Free text, e.g. `"40"`. See [`crate::content::price`].
    #[serde(default)]
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MenuEntry {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Category names are map keys, so they are unique by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuCatalog(pub BTreeMap<String, Vec<MenuEntry>>);

impl MenuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[MenuEntry])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn items(&self, category: &str) -> Option<&[MenuEntry]> {
        self.0.get(category).map(Vec::as_slice)
    }

    /// Add an empty category. Returns `false` for blank or existing names.
    pub fn add_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.0.contains_key(name) {
            return false;
        }
        self.0.insert(name.to_string(), Vec::new());
        true
    }

    pub fn delete_category(&mut self, name: &str) -> Option<Vec<MenuEntry>> {
        self.0.remove(name)
    }

    /// Append an entry, creating the category if needed. Entries without a
    /// name or price are refused.
    pub fn add_item(&mut self, category: &str, entry: MenuEntry) -> bool {
        if entry.name.trim().is_empty() || entry.price.trim().is_empty() {
            return false;
        }
        self.0.entry(category.to_string()).or_default().push(entry);
        true
    }

    pub fn update_item<F>(&mut self, category: &str, index: usize, f: F) -> bool
    where
        F: FnOnce(&mut MenuEntry),
    {
        match self.0.get_mut(category).and_then(|items| items.get_mut(index)) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }

    pub fn delete_item(&mut self, category: &str, index: usize) -> Option<MenuEntry> {
        let items = self.0.get_mut(category)?;
        (index < items.len()).then(|| items.remove(index))
    }
}

impl DocumentShape for MenuCatalog {
    const COLLECTION: &'static str = "Menu";
    const DOC_ID: &'static str = "main";
    const SURFACE: &'static str = "menu";
}

/// Catalog shown when `Menu/main` has never been written.
pub fn default_catalog() -> MenuCatalog {
    let per_pair = |name: &str, price: &str| MenuEntry::new(name, price).with_description("Per pair");

    let mut catalog = MenuCatalog::new();
    catalog.0.insert(
        "टिफिन".into(),
        vec![MenuEntry::new("साधी पोळी, भाजी, भात, आमटी, कोशिंबीर", "150")
            .with_description("Complete tiffin meal")],
    );
    catalog.0.insert(
        "रोटी / ब्रेड".into(),
        vec![
            per_pair("भाकरी (ज्वारी, बाजरी)", "40"),
            per_pair("साधी पोळी", "24"),
            per_pair("घडीची पोळी", "28"),
            per_pair("फुलका", "20"),
            per_pair("नान", "40"),
            per_pair("तंदूर रोटी", "40"),
        ],
    );
    catalog.0.insert(
        "पराठा".into(),
        vec![
            per_pair("लाछा पराठा", "120"),
            per_pair("बटाटा पराठा", "120"),
            per_pair("मेथी पराठा", "120"),
            per_pair("पालक पराठा", "120"),
            per_pair("पनीर पराठा", "160"),
        ],
    );
    catalog.0.insert(
        "भात (Rice)".into(),
        vec![
            MenuEntry::new("साधा भात", "40"),
            MenuEntry::new("जीरा राईस", "60"),
            MenuEntry::new("मसाले भात (मटार)", "60"),
            MenuEntry::new("पुलाव", "80"),
        ],
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_category_rejects_blank_and_duplicates() {
        let mut catalog = MenuCatalog::new();
        assert!(catalog.add_category("Breads"));
        assert!(!catalog.add_category("Breads"));
        assert!(!catalog.add_category("   "));
        assert_eq!(catalog.items("Breads"), Some(&[][..]));
    }

    #[test]
    fn add_item_requires_name_and_price() {
        let mut catalog = MenuCatalog::new();
        assert!(!catalog.add_item("Breads", MenuEntry::new("Naan", "")));
        assert!(catalog.add_item("Breads", MenuEntry::new("Naan", "40")));
        assert_eq!(catalog.items("Breads").unwrap().len(), 1);
    }

    #[test]
    fn delete_item_out_of_range_is_none() {
        let mut catalog = MenuCatalog::new();
        catalog.add_item("Breads", MenuEntry::new("Naan", "40"));
        assert!(catalog.delete_item("Breads", 3).is_none());
        assert_eq!(catalog.delete_item("Breads", 0).unwrap().name, "Naan");
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut catalog = MenuCatalog::new();
        catalog.add_item("Breads", MenuEntry::new("Naan", "40"));
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Breads": [{ "name": "Naan", "price": "40" }] })
        );
    }
}
