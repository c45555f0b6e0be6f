//! Site colour theme (`Settings/theme`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::draft::DocumentShape;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteTheme {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
}

impl SiteTheme {
    pub const ALL: [SiteTheme; 4] = [SiteTheme::Blue, SiteTheme::Purple, SiteTheme::Green, SiteTheme::Orange];

    pub fn as_str(self) -> &'static str {
        match self {
            SiteTheme::Blue => "blue",
            SiteTheme::Purple => "purple",
            SiteTheme::Green => "green",
            SiteTheme::Orange => "orange",
        }
    }
}

impl fmt::Display for SiteTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteTheme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SiteTheme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::Validation(format!("Unknown theme '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSetting {
    pub theme: SiteTheme,
}

impl DocumentShape for ThemeSetting {
    const COLLECTION: &'static str = "Settings";
    const DOC_ID: &'static str = "theme";
    const SURFACE: &'static str = "theme";
    const MERGE: bool = true;
}
