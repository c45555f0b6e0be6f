//! Public read endpoints.
//!
//! Everything here reads committed state straight from the store; drafts are
//! never visible to visitors.

use axum::extract::{Query, State};
use axum::Json;
use kitchen_core::content::menu::default_catalog;
use kitchen_core::content::navbar::{AboutView, NavbarView};
use kitchen_core::content::{
    read_collection, read_document, AboutContent, HeroContent, MenuCatalog, NavbarContent,
    Product, PromotionalPopup, Service, SocialLinks, TiffinDay, TrendingItem,
};
use kitchen_core::draft::DraftError;
use kitchen_core::presentation::{
    menu_sections, product_listing, HeroView, MenuSection, PopupFeed, ServiceCard, TrendingCard,
};
use kitchen_core::store::StoreError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn fetch_failed(surface: &'static str) -> impl Fn(StoreError) -> AppError {
    move |source| AppError::Draft(DraftError::Fetch { surface, source })
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub hero: HeroView,
    pub navbar: NavbarView,
    pub about: AboutView,
    pub services: Vec<ServiceCard>,
    pub social: SocialLinks,
}

/// GET /api/home
pub async fn home(State(state): State<AppState>) -> AppResult<Json<DataResponse<HomePage>>> {
    let store = state.store.as_ref();
    let (hero, navbar, about, services, social) = tokio::try_join!(
        read_document::<HeroContent>(store),
        read_document::<NavbarContent>(store),
        read_document::<AboutContent>(store),
        read_collection::<Service>(store),
        read_document::<SocialLinks>(store),
    )
    .map_err(fetch_failed("home page"))?;

    let navbar = match navbar {
        Some(navbar) => navbar.view(true),
        None => NavbarContent::default().view(false),
    };

    Ok(Json(DataResponse {
        data: HomePage {
            hero: HeroView::from(hero),
            navbar,
            about: about.unwrap_or_default().into(),
            services: services.into_iter().map(ServiceCard::from).collect(),
            social: social.unwrap_or_default(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Menu, trending, tiffin
// ---------------------------------------------------------------------------

/// GET /api/menu
///
/// Falls back to the built-in catalog until a menu has been saved.
pub async fn menu(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<MenuSection>>>> {
    let catalog = read_document::<MenuCatalog>(state.store.as_ref())
        .await
        .map_err(fetch_failed("menu"))?
        .unwrap_or_else(default_catalog);
    Ok(Json(DataResponse {
        data: menu_sections(&catalog),
    }))
}

/// GET /api/trending
pub async fn trending(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TrendingCard>>>> {
    let items = read_collection::<TrendingItem>(state.store.as_ref())
        .await
        .map_err(fetch_failed("trending items"))?;
    Ok(Json(DataResponse {
        data: items.into_iter().map(TrendingCard::from).collect(),
    }))
}

/// GET /api/tiffin
///
/// The week in `order`.
pub async fn tiffin(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<TiffinDay>>>> {
    let days = read_collection::<TiffinDay>(state.store.as_ref())
        .await
        .map_err(fetch_failed("tiffin menu"))?;
    Ok(Json(DataResponse {
        data: days.into_iter().map(TiffinDay::for_display).collect(),
    }))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductListing {
    /// Terms the query expanded to; empty without a query.
    pub terms: Vec<String>,
    pub products: Vec<Product>,
}

/// GET /api/products?q=
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<DataResponse<ProductListing>>> {
    let products = read_collection::<Product>(state.store.as_ref())
        .await
        .map_err(fetch_failed("products"))?;

    let terms = match query.q.as_deref() {
        Some(q) => state.search.terms(q).await,
        None => Vec::new(),
    };
    let products = product_listing(products, &terms);
    tracing::debug!(terms = ?terms, matches = products.len(), "Product listing");

    Ok(Json(DataResponse {
        data: ProductListing { terms, products },
    }))
}

// ---------------------------------------------------------------------------
// Popups
// ---------------------------------------------------------------------------

/// GET /api/popups
pub async fn popups(State(state): State<AppState>) -> AppResult<Json<DataResponse<PopupFeed>>> {
    let popups = read_collection::<PromotionalPopup>(state.store.as_ref())
        .await
        .map_err(fetch_failed("offers"))?;
    Ok(Json(DataResponse {
        data: PopupFeed::new(popups),
    }))
}
