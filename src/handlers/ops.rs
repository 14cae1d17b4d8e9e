//! Execute-and-map core of the request lifecycle. Each function performs
//! exactly one store operation and translates the outcome into a response
//! body or an [`ApiError`]. Identifier parameters arrive raw and are parsed
//! here before any filter is built, so a store is never queried with an
//! unvalidated identifier.

use chrono::Utc;
use mongodb::bson::{doc, Document};
use serde_json::{json, Value};

use crate::api::format::{document_to_json, documents_to_json};
use crate::db::Store;
use crate::error::ApiError;
use crate::schema;

/// GET /{resource}: bounded collection scan. An empty array is a success.
pub async fn list(store: &dyn Store, limit: i64) -> Result<Value, ApiError> {
    let documents = store.find_all(limit).await?;
    Ok(documents_to_json(&documents))
}

/// GET /{resource}/{id}
pub async fn fetch(store: &dyn Store, raw_id: &str) -> Result<Value, ApiError> {
    let id = schema::object_id(raw_id)?;
    match store.find_by_id(&id).await? {
        Some(document) => Ok(document_to_json(&document)),
        None => Err(ApiError::not_found(format!("document {} not found", raw_id))),
    }
}

/// Relational lookup by a prebuilt filter (single document or 404).
pub async fn fetch_match(store: &dyn Store, filter: Document) -> Result<Value, ApiError> {
    match store.find_by_filter(filter).await? {
        Some(document) => Ok(document_to_json(&document)),
        None => Err(ApiError::not_found("no document matches the filter")),
    }
}

/// POST /{resource}: insert one validated document. When `stamp_field` is
/// set, the server writes the timestamp itself; any client value for that
/// field has already been discarded by validation.
pub async fn create(
    store: &dyn Store,
    mut document: Document,
    stamp_field: Option<&str>,
) -> Result<Value, ApiError> {
    if let Some(field) = stamp_field {
        document.insert(field, Utc::now().to_rfc3339());
    }
    let inserted_id = store.insert(document).await?;
    Ok(json!({ "insertedId": inserted_id.to_hex() }))
}

/// PUT /{resource}/{id}: full-document replace. The `_id` is immutable, so
/// any id in the replacement body is dropped in favor of the path id. A
/// stamped field is rewritten on replace as well; the replace is a single
/// round-trip, so the original stamp cannot be carried over.
pub async fn replace(
    store: &dyn Store,
    raw_id: &str,
    mut document: Document,
    stamp_field: Option<&str>,
) -> Result<Value, ApiError> {
    let id = schema::object_id(raw_id)?;
    document.remove("_id");
    if let Some(field) = stamp_field {
        document.insert(field, Utc::now().to_rfc3339());
    }
    let outcome = store.replace_by_id(&id, document).await?;
    if outcome.matched == 0 {
        return Err(ApiError::not_found(format!("document {} not found", raw_id)));
    }
    Ok(json!({ "matchedCount": outcome.matched, "modifiedCount": outcome.modified }))
}

/// DELETE /{resource}/{id}. Deleting an absent document is a success with a
/// zero count, not an error.
pub async fn remove(store: &dyn Store, raw_id: &str) -> Result<Value, ApiError> {
    let id = schema::object_id(raw_id)?;
    let outcome = store.delete_by_id(&id).await?;
    Ok(json!({ "deletedCount": outcome.deleted }))
}

/// Bulk delete by filter; an empty filter clears the collection.
pub async fn remove_match(store: &dyn Store, filter: Document) -> Result<Value, ApiError> {
    let outcome = store.delete_by_filter(filter).await?;
    Ok(json!({ "deletedCount": outcome.deleted }))
}

/// DELETE /{resource}
pub async fn remove_all(store: &dyn Store) -> Result<Value, ApiError> {
    remove_match(store, doc! {}).await
}
