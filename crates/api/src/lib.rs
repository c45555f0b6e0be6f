//! Mona's Kitchen API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, draft
//! sessions) so integration tests and the binaries can both access them.

pub mod auth;
pub mod config;
pub mod drafts;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod seed;
pub mod state;
