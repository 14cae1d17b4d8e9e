use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Collection, Database};

use super::provider::DbError;

/// Result of a full-document replace. A zero matched count is a normal
/// outcome (the handler maps it to 404), never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: u64,
}

/// The persistence operations a request may perform, each a single atomic
/// round-trip against a borrowed connection. Implemented by [`Repository`]
/// for MongoDB and by an in-memory store for lifecycle tests.
#[async_trait]
pub trait Store: Send + Sync {
    /// Up to `limit` documents in storage order. Empty is a valid outcome.
    async fn find_all(&self, limit: i64) -> Result<Vec<Document>, DbError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, DbError>;

    /// Relational lookup, e.g. "the connection from device X".
    async fn find_by_filter(&self, filter: Document) -> Result<Option<Document>, DbError>;

    /// Insert one document. The server generates `_id` when the document
    /// carries none; the assigned identifier is returned either way.
    async fn insert(&self, document: Document) -> Result<ObjectId, DbError>;

    /// Full-document replace by id.
    async fn replace_by_id(&self, id: &ObjectId, document: Document) -> Result<UpdateOutcome, DbError>;

    async fn delete_by_id(&self, id: &ObjectId) -> Result<DeleteOutcome, DbError>;

    /// Bulk delete, e.g. "all connections to device Y".
    async fn delete_by_filter(&self, filter: Document) -> Result<DeleteOutcome, DbError>;
}

/// One instantiation per entity collection, executing against the
/// request-scoped connection it was built from.
pub struct Repository {
    collection: Collection<Document>,
}

impl Repository {
    pub fn new(database: &Database, collection_name: &str) -> Self {
        Self { collection: database.collection::<Document>(collection_name) }
    }
}

#[async_trait]
impl Store for Repository {
    async fn find_all(&self, limit: i64) -> Result<Vec<Document>, DbError> {
        let cursor = self.collection.find(doc! {}).limit(limit).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, DbError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_filter(&self, filter: Document) -> Result<Option<Document>, DbError> {
        Ok(self.collection.find_one(filter).await?)
    }

    async fn insert(&self, document: Document) -> Result<ObjectId, DbError> {
        let result = self.collection.insert_one(document).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DbError::Query("insert returned a non-ObjectId identifier".to_string()))
    }

    async fn replace_by_id(&self, id: &ObjectId, document: Document) -> Result<UpdateOutcome, DbError> {
        let result = self.collection.replace_one(doc! { "_id": id }, document).await?;
        Ok(UpdateOutcome { matched: result.matched_count, modified: result.modified_count })
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<DeleteOutcome, DbError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(DeleteOutcome { deleted: result.deleted_count })
    }

    async fn delete_by_filter(&self, filter: Document) -> Result<DeleteOutcome, DbError> {
        let result = self.collection.delete_many(filter).await?;
        Ok(DeleteOutcome { deleted: result.deleted_count })
    }
}
