//! Row types for the `documents` table.

use kitchen_core::store::Document;
use kitchen_core::types::{DocId, Timestamp};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

/// A full row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentRow {
    pub collection: String,
    pub id: DocId,
    pub data: Value,
    pub seq: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The columns a [`Document`] needs.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentBody {
    pub id: DocId,
    pub data: Value,
}

impl From<DocumentBody> for Document {
    fn from(row: DocumentBody) -> Self {
        Document {
            id: row.id,
            data: row.data,
        }
    }
}
