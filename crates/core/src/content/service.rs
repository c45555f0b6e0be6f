//! Services listing (`Services/*`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::Record;
use crate::types::DocId;

/// Storage key the public home page reads the image from.
const LEGACY_IMAGE_KEY: &str = "img";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub id: DocId,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl Record for Service {
    const COLLECTION: &'static str = "Services";
    const SURFACE: &'static str = "services";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: DocId) {
        self.id = id;
    }

    /// Documents store the image under `img`, newer ones under `imageUrl`.
    fn decode(id: &str, mut data: Value) -> Result<Self, serde_json::Error> {
        if let Some(obj) = data.as_object_mut() {
            let legacy = obj.remove(LEGACY_IMAGE_KEY);
            let current_empty = obj
                .get("imageUrl")
                .and_then(Value::as_str)
                .is_none_or(str::is_empty);
            if current_empty {
                if let Some(img) = legacy {
                    obj.insert("imageUrl".into(), img);
                }
            }
            obj.insert("id".into(), Value::String(id.to_string()));
        }
        serde_json::from_value(data)
    }

    fn encode(&self) -> Value {
        serde_json::json!({
            "title": self.title,
            "description": self.description,
            "imageUrl": self.image_url,
            LEGACY_IMAGE_KEY: self.image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_falls_back_to_img() {
        let service = Service::decode("s1", json!({ "title": "Catering", "img": "u" })).unwrap();
        assert_eq!(service.id, "s1");
        assert_eq!(service.image_url, "u");
    }

    #[test]
    fn decode_prefers_image_url() {
        let service =
            Service::decode("s1", json!({ "imageUrl": "new", "img": "old" })).unwrap();
        assert_eq!(service.image_url, "new");
    }

    #[test]
    fn encode_writes_both_image_keys_without_id() {
        let service = Service {
            id: "s1".into(),
            title: "Catering".into(),
            description: String::new(),
            image_url: "u".into(),
        };
        let data = service.encode();
        assert_eq!(data["img"], "u");
        assert_eq!(data["imageUrl"], "u");
        assert!(data.get("id").is_none());
    }
}
