pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, content, drafts, theme, upload};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /login                              login (public)
/// /upload                             image upload (admin, multipart)
///
/// /home                               hero, navbar, about, services, social
/// /menu                               menu sections
/// /trending                           trending cards
/// /tiffin                             tiffin week
/// /products?q=                        products, optional smart search
/// /popups                             offers + rotation schedule
///
/// /settings/theme                     get, update (PUT admin)
/// /settings/theme/stream              server-sent theme events
///
/// /admin/drafts/{surface}             view, edit (GET, PATCH)
/// /admin/drafts/{surface}/commit      commit (POST)
/// /admin/drafts/{surface}/discard     discard (POST)
/// ```
pub fn api_routes(upload_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(upload_max_bytes)),
        )
        .route("/home", get(content::home))
        .route("/menu", get(content::menu))
        .route("/trending", get(content::trending))
        .route("/tiffin", get(content::tiffin))
        .route("/products", get(content::products))
        .route("/popups", get(content::popups))
        .route(
            "/settings/theme",
            get(theme::get_theme).put(theme::update_theme),
        )
        .route("/settings/theme/stream", get(theme::theme_stream))
        .nest("/admin/drafts", draft_routes())
}

fn draft_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{surface}",
            get(drafts::get_draft).patch(drafts::edit_draft),
        )
        .route("/{surface}/commit", post(drafts::commit_draft))
        .route("/{surface}/discard", post(drafts::discard_draft))
}
