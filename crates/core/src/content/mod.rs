//! Site content entities and their draft sources.

pub mod hero;
pub mod menu;
pub mod navbar;
pub mod popup;
pub mod price;
pub mod product;
pub mod service;
pub mod social;
pub mod theme;
pub mod tiffin;
pub mod trending;

use validator::ValidationErrors;

use crate::draft::{Collection, DocumentShape, Record, SingleDocument};
use crate::store::{DocumentStore, StoreError};

pub use hero::HeroContent;
pub use menu::{MenuCatalog, MenuEntry};
pub use navbar::{AboutContent, NavbarContent};
pub use popup::{PopupTheme, PromotionalPopup};
pub use product::{Pinned, Product};
pub use service::Service;
pub use social::SocialLinks;
pub use theme::{SiteTheme, ThemeSetting};
pub use tiffin::{TiffinDay, TiffinLine};
pub use trending::TrendingItem;

pub type MenuSource = SingleDocument<MenuCatalog>;
pub type HeroSource = SingleDocument<HeroContent>;
pub type SocialSource = SingleDocument<SocialLinks>;
pub type ServicesSource = Collection<Service>;
pub type TrendingSource = Collection<TrendingItem>;
pub type TiffinSource = Collection<TiffinDay>;
pub type PopupsSource = Collection<PromotionalPopup>;
pub type ProductsSource = Collection<Product>;

/// Read a single-document entity. `None` when it was never written.
pub async fn read_document<T: DocumentShape>(
    store: &dyn DocumentStore,
) -> Result<Option<T>, StoreError> {
    let Some(doc) = store.get(T::COLLECTION, T::DOC_ID).await? else {
        return Ok(None);
    };
    T::decode(doc.data).map(Some).map_err(|source| StoreError::Decode {
        collection: T::COLLECTION.to_string(),
        id: doc.id,
        source,
    })
}

/// Read every record of a collection entity in its listing order.
pub async fn read_collection<T: Record>(store: &dyn DocumentStore) -> Result<Vec<T>, StoreError> {
    store
        .list(T::COLLECTION, T::ORDER_BY)
        .await?
        .into_iter()
        .map(|doc| {
            T::decode(&doc.id, doc.data).map_err(|source| StoreError::Decode {
                collection: T::COLLECTION.to_string(),
                id: doc.id.clone(),
                source,
            })
        })
        .collect()
}

/// Flatten derive-validation failures into one sentence, field order stable.
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid ({})", e.code),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}
