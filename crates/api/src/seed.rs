//! Starter content for an empty store: the default menu and a sample
//! tiffin week. Existing content is never overwritten.

use chrono::NaiveDate;
use kitchen_core::content::menu::default_catalog;
use kitchen_core::content::tiffin::week_starting;
use kitchen_core::content::{MenuCatalog, TiffinDay};
use kitchen_core::draft::{DocumentShape, Record};
use kitchen_core::store::{DocumentStore, StoreError, WriteOp};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// `Menu/main` was written.
    pub menu: bool,
    /// Tiffin days written (0 when the week already existed).
    pub tiffin_days: usize,
}

/// Write whatever starter content is missing; `today` labels the tiffin week.
pub async fn seed_store(store: &dyn DocumentStore, today: NaiveDate) -> Result<SeedReport, StoreError> {
    let mut ops = Vec::new();

    let menu = store.get(MenuCatalog::COLLECTION, MenuCatalog::DOC_ID).await?.is_none();
    if menu {
        ops.push(WriteOp::Set {
            collection: MenuCatalog::COLLECTION.to_string(),
            id: MenuCatalog::DOC_ID.to_string(),
            data: default_catalog().encode(),
        });
    }

    let tiffin_days = if store.list(TiffinDay::COLLECTION, None).await?.is_empty() {
        let week = week_starting(today);
        let count = week.len();
        ops.extend(week.iter().map(|day| WriteOp::Set {
            collection: TiffinDay::COLLECTION.to_string(),
            id: Record::id(day).to_string(),
            data: Record::encode(day),
        }));
        count
    } else {
        0
    };

    store.apply_batch(&ops).await.map_err(|e| e.source)?;
    tracing::info!(menu, tiffin_days, "Seeded store");
    Ok(SeedReport { menu, tiffin_days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_core::content::{read_collection, read_document};
    use kitchen_core::store::memory::MemoryDocumentStore;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    #[tokio::test]
    async fn seeds_an_empty_store() {
        let store = MemoryDocumentStore::new();
        let report = seed_store(&store, monday()).await.unwrap();
        assert_eq!(report, SeedReport { menu: true, tiffin_days: 7 });

        let menu = read_document::<MenuCatalog>(&store).await.unwrap().unwrap();
        assert_eq!(menu, default_catalog());
        let week = read_collection::<TiffinDay>(&store).await.unwrap();
        let orders: Vec<i64> = week.iter().map(|d| d.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(week[0].day, "Today");
    }

    #[tokio::test]
    async fn existing_content_is_left_alone() {
        let store = MemoryDocumentStore::new();
        store
            .set("Menu", "main", serde_json::json!({ "Breads": [{ "name": "Naan", "price": "40" }] }))
            .await
            .unwrap();
        seed_store(&store, monday()).await.unwrap();

        let writes = store.write_count();
        let report = seed_store(&store, monday()).await.unwrap();
        assert_eq!(report, SeedReport { menu: false, tiffin_days: 0 });
        assert_eq!(store.write_count(), writes);

        let menu = read_document::<MenuCatalog>(&store).await.unwrap().unwrap();
        assert_eq!(menu.items("Breads").map(<[_]>::len), Some(1));
    }
}
