//! [`DocumentStore`] backed by the Postgres `documents` table.
//!
//! Batches run in one transaction, so a failed commit leaves the collection
//! exactly as it was (`applied == 0`).

use async_trait::async_trait;
use kitchen_core::store::{
    ensure_object, BatchError, Document, DocumentStore, StoreError, WriteOp,
};
use kitchen_core::types::{new_doc_id, DocId};
use serde_json::Value;
use sqlx::PgExecutor;

use crate::models::{DocumentBody, DocumentRow};
use crate::DbPool;

// ---------------------------------------------------------------------------
// SQL
// ---------------------------------------------------------------------------

const ROW_COLUMNS: &str = "collection, id, data, seq, created_at, updated_at";

const UPSERT_REPLACE: &str = "\
    INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) \
    ON CONFLICT (collection, id) \
    DO UPDATE SET data = EXCLUDED.data, updated_at = now()";

const UPSERT_MERGE: &str = "\
    INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) \
    ON CONFLICT (collection, id) \
    DO UPDATE SET data = documents.data || EXCLUDED.data, updated_at = now()";

const UPDATE_EXISTING: &str = "\
    UPDATE documents SET data = data || $3, updated_at = now() \
    WHERE collection = $1 AND id = $2";

const DELETE: &str = "DELETE FROM documents WHERE collection = $1 AND id = $2";

/// Numbers, then strings, then booleans, then documents without the field;
/// ties in insertion order. `$2` is the field name.
const ORDER_BY_FIELD: &str = "\
    ORDER BY \
        CASE jsonb_typeof(data -> $2) \
            WHEN 'number' THEN 0 WHEN 'string' THEN 1 WHEN 'boolean' THEN 2 ELSE 3 END, \
        CASE WHEN jsonb_typeof(data -> $2) = 'number' THEN (data ->> $2)::numeric END, \
        CASE WHEN jsonb_typeof(data -> $2) = 'string' THEN data ->> $2 END COLLATE \"C\", \
        CASE WHEN jsonb_typeof(data -> $2) = 'boolean' THEN (data ->> $2)::boolean END, \
        seq";

fn unavailable(e: sqlx::Error) -> StoreError {
    tracing::error!(error = %e, "Document store query failed");
    StoreError::Unavailable(e.to_string())
}

async fn execute_op<'e, E>(executor: E, op: &WriteOp) -> Result<(), StoreError>
where
    E: PgExecutor<'e>,
{
    let (sql, data) = match op {
        WriteOp::Set { data, .. } => (UPSERT_REPLACE, Some(data)),
        WriteOp::Merge { fields, .. } => (UPSERT_MERGE, Some(fields)),
        WriteOp::Delete { .. } => (DELETE, None),
    };
    if let Some(data) = data {
        ensure_object(data)?;
    }

    let mut query = sqlx::query(sql).bind(op.collection()).bind(op.id());
    if let Some(data) = data {
        query = query.bind(data);
    }
    query.execute(executor).await.map_err(unavailable)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// PgDocumentStore
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: DbPool,
}

impl PgDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Full row including bookkeeping columns.
    pub async fn row(&self, collection: &str, id: &str) -> Result<Option<DocumentRow>, StoreError> {
        let query = format!("SELECT {ROW_COLUMNS} FROM documents WHERE collection = $1 AND id = $2");
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentBody>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(row.map(Document::from))
    }

    async fn list(
        &self,
        collection: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = match order_by {
            Some(field) => {
                let query = format!(
                    "SELECT id, data FROM documents WHERE collection = $1 {ORDER_BY_FIELD}"
                );
                sqlx::query_as::<_, DocumentBody>(&query)
                    .bind(collection)
                    .bind(field)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, DocumentBody>(
                    "SELECT id, data FROM documents WHERE collection = $1 ORDER BY seq",
                )
                .bind(collection)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(unavailable)?;
        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let op = WriteOp::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
        };
        execute_op(&self.pool, &op).await
    }

    async fn merge(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        let op = WriteOp::Merge {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        };
        execute_op(&self.pool, &op).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        ensure_object(&fields)?;
        let result = sqlx::query(UPDATE_EXISTING)
            .bind(collection)
            .bind(id)
            .bind(&fields)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn add(&self, collection: &str, data: Value) -> Result<DocId, StoreError> {
        let id = new_doc_id();
        self.set(collection, &id, data).await?;
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let op = WriteOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        };
        execute_op(&self.pool, &op).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(unavailable)
    }

    /// All or nothing: on any failure the transaction is rolled back and
    /// `applied` is 0.
    async fn apply_batch(&self, ops: &[WriteOp]) -> Result<(), BatchError> {
        let total = ops.len();
        let failed = |source| BatchError {
            applied: 0,
            total,
            source,
        };

        let mut tx = self.pool.begin().await.map_err(|e| failed(unavailable(e)))?;
        for op in ops {
            // Dropping `tx` on the error path rolls the transaction back.
            execute_op(&mut *tx, op).await.map_err(failed)?;
        }
        tx.commit().await.map_err(|e| failed(unavailable(e)))?;

        tracing::debug!(writes = total, "Applied document batch");
        Ok(())
    }
}
