/// Document identifiers are opaque strings assigned by the store or by the
/// draft normalizer.
pub type DocId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh document id (32 hex chars, no hyphens).
pub fn new_doc_id() -> DocId {
    uuid::Uuid::new_v4().simple().to_string()
}
