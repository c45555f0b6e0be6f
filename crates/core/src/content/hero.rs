//! Hero banner (`Home/hero-section`).
//!
//! Older documents hold the banner under `hero-text` / `hero-img`, newer ones
//! under `text` / `imageUrl`. Reads accept either (new keys win when
//! non-empty) and writes set both pairs so every reader sees the same value.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::draft::DocumentShape;
use crate::store::{DocumentStore, StoreError};

pub const COLLECTION: &str = "Home";
pub const DOC_ID: &str = "hero-section";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroContent {
    pub text: String,
    pub image_url: String,
    pub insta_link: String,
}

fn non_empty_str<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn first_of(data: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| non_empty_str(data, key))
        .unwrap_or_default()
        .to_string()
}

impl DocumentShape for HeroContent {
    const COLLECTION: &'static str = COLLECTION;
    const DOC_ID: &'static str = DOC_ID;
    const SURFACE: &'static str = "hero";
    const MERGE: bool = true;

    fn decode(data: Value) -> Result<Self, serde_json::Error> {
        let data = match data {
            Value::Object(data) => data,
            other => return serde_json::from_value(other),
        };
        Ok(Self {
            text: first_of(&data, &["text", "hero-text"]),
            image_url: first_of(&data, &["imageUrl", "hero-img"]),
            insta_link: first_of(&data, &["insta-link", "instaLink"]),
        })
    }

    fn encode(&self) -> Value {
        json!({
            "text": self.text,
            "imageUrl": self.image_url,
            "hero-text": self.text,
            "hero-img": self.image_url,
            "insta-link": self.insta_link,
        })
    }
}

/// Copy legacy-only hero values into the canonical keys.
///
/// Returns `true` when a write was made. Safe to run on every startup.
pub async fn migrate_legacy_keys(store: &dyn DocumentStore) -> Result<bool, StoreError> {
    let Some(doc) = store.get(COLLECTION, DOC_ID).await? else {
        return Ok(false);
    };
    let Value::Object(data) = &doc.data else {
        return Ok(false);
    };

    let mut fields = Map::new();
    for (canonical, legacy) in [("text", "hero-text"), ("imageUrl", "hero-img")] {
        if non_empty_str(data, canonical).is_none() {
            if let Some(value) = non_empty_str(data, legacy) {
                fields.insert(canonical.to_string(), Value::String(value.to_string()));
            }
        }
    }
    if fields.is_empty() {
        return Ok(false);
    }

    tracing::info!(keys = ?fields.keys().collect::<Vec<_>>(), "Migrating legacy hero keys");
    store.merge(COLLECTION, DOC_ID, Value::Object(fields)).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryDocumentStore;

    #[test]
    fn decode_prefers_canonical_keys() {
        let hero = HeroContent::decode(json!({
            "text": "",
            "hero-text": "legacy text",
            "imageUrl": "new.png",
            "hero-img": "old.png",
        }))
        .unwrap();
        assert_eq!(hero.text, "legacy text");
        assert_eq!(hero.image_url, "new.png");
    }

    #[test]
    fn encode_writes_both_key_pairs() {
        let hero = HeroContent {
            text: "Fresh".into(),
            image_url: "a.png".into(),
            insta_link: String::new(),
        };
        let data = hero.encode();
        assert_eq!(data["text"], "Fresh");
        assert_eq!(data["hero-text"], "Fresh");
        assert_eq!(data["imageUrl"], "a.png");
        assert_eq!(data["hero-img"], "a.png");
    }

    #[tokio::test]
    async fn migration_fills_missing_canonical_keys_once() {
        let store = MemoryDocumentStore::new();
        store
            .set(COLLECTION, DOC_ID, json!({ "hero-text": "Hi", "hero-img": "h.png", "insta-link": "ig" }))
            .await
            .unwrap();

        assert!(migrate_legacy_keys(&store).await.unwrap());
        let doc = store.get(COLLECTION, DOC_ID).await.unwrap().unwrap();
        assert_eq!(doc.data["text"], "Hi");
        assert_eq!(doc.data["imageUrl"], "h.png");
        assert_eq!(doc.data["insta-link"], "ig");

        assert!(!migrate_legacy_keys(&store).await.unwrap());
    }

    #[tokio::test]
    async fn migration_without_document_is_noop() {
        let store = MemoryDocumentStore::new();
        assert!(!migrate_legacy_keys(&store).await.unwrap());
        assert_eq!(store.write_count(), 0);
    }
}
