pub mod auth;
pub mod content;
pub mod drafts;
pub mod theme;
pub mod upload;
