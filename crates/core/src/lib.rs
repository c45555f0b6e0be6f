//! Domain logic for the kitchen site: the document store abstraction, the
//! Draft-Edit-Commit controller, content entities and their public views.
//!
//! No HTTP or database code lives here; `kitchen-api` and `kitchen-db` build
//! on these types.

pub mod cache;
pub mod content;
pub mod draft;
pub mod error;
pub mod presentation;
pub mod search;
pub mod store;
pub mod types;
