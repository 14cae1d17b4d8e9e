//! Uniform CRUD handlers, dispatched on the `{resource}` path segment.
//! Every handler follows the same terminal state machine: validate, acquire
//! a scoped connection, execute one repository operation, map the outcome,
//! release. Validation failures skip connection acquisition entirely.

use axum::extract::{Path, State};
use axum::response::Json;
use serde_json::Value;

use super::{ops, AppState};
use crate::api::format;
use crate::db::Repository;
use crate::error::ApiError;
use crate::schema::{self, entities::Resource};

fn resolve(segment: &str) -> Result<&'static Resource, ApiError> {
    schema::entities::lookup(segment)
        .ok_or_else(|| ApiError::not_found(format!("unknown resource: {}", segment)))
}

/// GET /{resource}
pub async fn collection_get(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let resource = resolve(&segment)?;
    let limit = state.read_limit;
    let data = state
        .provider
        .scoped(|db| async move { ops::list(&Repository::new(&db, resource.collection), limit).await })
        .await?;
    Ok(Json(format::ok(data)))
}

/// POST /{resource}
pub async fn collection_post(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let resource = resolve(&segment)?;
    let document = resource.schema().validate(&payload)?;
    let data = state
        .provider
        .scoped(|db| async move {
            ops::create(&Repository::new(&db, resource.collection), document, resource.stamp_field)
                .await
        })
        .await?;
    Ok(Json(format::ok(data)))
}

/// DELETE /{resource} - bulk, clears the collection
pub async fn collection_delete(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let resource = resolve(&segment)?;
    let data = state
        .provider
        .scoped(|db| async move { ops::remove_all(&Repository::new(&db, resource.collection)).await })
        .await?;
    Ok(Json(format::ok(data)))
}

/// GET /{resource}/{id}
pub async fn record_get(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let resource = resolve(&segment)?;
    schema::object_id(&id)?;
    let data = state
        .provider
        .scoped(|db| async move { ops::fetch(&Repository::new(&db, resource.collection), &id).await })
        .await?;
    Ok(Json(format::ok(data)))
}

/// PUT /{resource}/{id} - full-document replace
pub async fn record_put(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let resource = resolve(&segment)?;
    schema::object_id(&id)?;
    let document = resource.schema().validate(&payload)?;
    let data = state
        .provider
        .scoped(|db| async move {
            ops::replace(&Repository::new(&db, resource.collection), &id, document, resource.stamp_field)
                .await
        })
        .await?;
    Ok(Json(format::ok(data)))
}

/// DELETE /{resource}/{id}
pub async fn record_delete(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let resource = resolve(&segment)?;
    schema::object_id(&id)?;
    let data = state
        .provider
        .scoped(|db| async move { ops::remove(&Repository::new(&db, resource.collection), &id).await })
        .await?;
    Ok(Json(format::ok(data)))
}
