//! In-memory [`Store`] for exercising the request-lifecycle core without a
//! running database. Counts every persistence call so tests can assert that
//! validation failures never reach the store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::db::{DbError, DeleteOutcome, Store, UpdateOutcome};

pub struct MemStore {
    documents: Mutex<Vec<Document>>,
    calls: AtomicUsize,
}

impl MemStore {
    pub fn new() -> Self {
        Self { documents: Mutex::new(Vec::new()), calls: AtomicUsize::new(0) }
    }

    /// Total number of persistence operations executed against this store.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    // Exact-match semantics on top-level fields, which is all the filters
    // built by the handlers ever contain.
    fn matches(document: &Document, filter: &Document) -> bool {
        filter.iter().all(|(key, value)| document.get(key) == Some(value))
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn find_all(&self, limit: i64) -> Result<Vec<Document>, DbError> {
        self.touch();
        let documents = self.documents.lock().expect("store poisoned");
        Ok(documents.iter().take(limit.max(0) as usize).cloned().collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, DbError> {
        self.touch();
        let documents = self.documents.lock().expect("store poisoned");
        Ok(documents
            .iter()
            .find(|d| d.get("_id") == Some(&Bson::ObjectId(*id)))
            .cloned())
    }

    async fn find_by_filter(&self, filter: Document) -> Result<Option<Document>, DbError> {
        self.touch();
        let documents = self.documents.lock().expect("store poisoned");
        Ok(documents.iter().find(|d| Self::matches(d, &filter)).cloned())
    }

    async fn insert(&self, mut document: Document) -> Result<ObjectId, DbError> {
        self.touch();
        let id = match document.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };
        self.documents.lock().expect("store poisoned").push(document);
        Ok(id)
    }

    async fn replace_by_id(&self, id: &ObjectId, document: Document) -> Result<UpdateOutcome, DbError> {
        self.touch();
        let mut documents = self.documents.lock().expect("store poisoned");
        let position = documents
            .iter()
            .position(|d| d.get("_id") == Some(&Bson::ObjectId(*id)));

        match position {
            None => Ok(UpdateOutcome { matched: 0, modified: 0 }),
            Some(index) => {
                let mut replacement = Document::new();
                replacement.insert("_id", *id);
                for (key, value) in document {
                    if key != "_id" {
                        replacement.insert(key, value);
                    }
                }
                let modified = u64::from(documents[index] != replacement);
                documents[index] = replacement;
                Ok(UpdateOutcome { matched: 1, modified })
            }
        }
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<DeleteOutcome, DbError> {
        self.touch();
        let mut documents = self.documents.lock().expect("store poisoned");
        let before = documents.len();
        documents.retain(|d| d.get("_id") != Some(&Bson::ObjectId(*id)));
        Ok(DeleteOutcome { deleted: (before - documents.len()) as u64 })
    }

    async fn delete_by_filter(&self, filter: Document) -> Result<DeleteOutcome, DbError> {
        self.touch();
        let mut documents = self.documents.lock().expect("store poisoned");
        let before = documents.len();
        documents.retain(|d| !Self::matches(d, &filter));
        Ok(DeleteOutcome { deleted: (before - documents.len()) as u64 })
    }
}
