//! Navigation bar (`Home/navbar`) and about section (`Home/about-section`).
//!
//! Both are read-only here; they are edited directly in the store.

use serde::{Deserialize, Serialize};

use crate::draft::DocumentShape;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarContent {
    pub logo: String,
    pub item1: String,
    pub item2: String,
    pub item3: String,
    pub item4: String,
    pub item5: String,
}

impl DocumentShape for NavbarContent {
    const COLLECTION: &'static str = "Home";
    const DOC_ID: &'static str = "navbar";
    const SURFACE: &'static str = "navbar";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: String,
    pub href: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavbarView {
    pub logo: String,
    pub links: Vec<NavLink>,
}

const DEFAULT_LOGO: &str = "/logo.png";
const DEFAULT_LINKS: [(&str, &str); 5] = [
    ("Home", "/"),
    ("About", "/about"),
    ("Our specialities", "/rasoi"),
    ("Trending", "/trending"),
    ("Contact", "/contact"),
];

impl NavbarContent {
    /// Labels fall back to the defaults; links whose label ends up empty
    /// are dropped.
    pub fn view(self, stored: bool) -> NavbarView {
        let labels = [self.item1, self.item2, self.item3, self.item4, self.item5];
        let links = labels
            .into_iter()
            .zip(DEFAULT_LINKS)
            .map(|(label, (default, href))| NavLink {
                name: if stored { label } else { default.to_string() },
                href,
            })
            .filter(|link| !link.name.trim().is_empty())
            .collect();
        NavbarView {
            logo: if self.logo.is_empty() {
                DEFAULT_LOGO.to_string()
            } else {
                self.logo
            },
            links,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutContent {
    #[serde(rename = "abt-text")]
    pub text: String,
    #[serde(rename = "feature-1")]
    pub feature_1: String,
    #[serde(rename = "feature-2")]
    pub feature_2: String,
}

impl DocumentShape for AboutContent {
    const COLLECTION: &'static str = "Home";
    const DOC_ID: &'static str = "about-section";
    const SURFACE: &'static str = "about";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AboutView {
    pub text: String,
    pub features: Vec<String>,
}

impl From<AboutContent> for AboutView {
    fn from(about: AboutContent) -> Self {
        Self {
            text: about.text,
            features: [about.feature_1, about.feature_2]
                .into_iter()
                .filter(|f| !f.trim().is_empty())
                .collect(),
        }
    }
}
