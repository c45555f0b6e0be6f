//! Social links (`social/links`).

use serde::{Deserialize, Serialize};

use crate::draft::DocumentShape;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub instagram: String,
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
}

impl DocumentShape for SocialLinks {
    const COLLECTION: &'static str = "social";
    const DOC_ID: &'static str = "links";
    const SURFACE: &'static str = "social";
    const MERGE: bool = true;

    fn normalize(&mut self) {
        for link in [&mut self.instagram, &mut self.facebook, &mut self.twitter, &mut self.linkedin] {
            *link = link.trim().to_string();
        }
    }
}
