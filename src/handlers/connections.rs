//! Relational extension routes for connections: lookups and bulk cleanup by
//! the device a connection points at. Filters are built from parsed
//! ObjectIds only, so a malformed path id can never widen into a
//! match-everything filter.

use axum::extract::{Path, State};
use axum::response::Json;
use mongodb::bson::doc;
use serde_json::Value;

use super::{ops, AppState};
use crate::api::format;
use crate::db::Repository;
use crate::error::ApiError;
use crate::schema;

const COLLECTION: &str = "connection";

/// GET /connections/from/{id}
pub async fn from_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let device_id = schema::object_id(&id)?;
    let data = state
        .provider
        .scoped(|db| async move {
            ops::fetch_match(&Repository::new(&db, COLLECTION), doc! { "deviceIdFrom": device_id })
                .await
        })
        .await?;
    Ok(Json(format::ok(data)))
}

/// GET /connections/to/{id}
pub async fn to_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let device_id = schema::object_id(&id)?;
    let data = state
        .provider
        .scoped(|db| async move {
            ops::fetch_match(&Repository::new(&db, COLLECTION), doc! { "deviceIdTo": device_id })
                .await
        })
        .await?;
    Ok(Json(format::ok(data)))
}

/// GET /connections/from/{idFrom}/to/{idTo}
pub async fn between_get(
    State(state): State<AppState>,
    Path((id_from, id_to)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let from = schema::object_id(&id_from)?;
    let to = schema::object_id(&id_to)?;
    let data = state
        .provider
        .scoped(|db| async move {
            ops::fetch_match(
                &Repository::new(&db, COLLECTION),
                doc! { "deviceIdFrom": from, "deviceIdTo": to },
            )
            .await
        })
        .await?;
    Ok(Json(format::ok(data)))
}

/// DELETE /connections/from/{id} - bulk relational cleanup
pub async fn from_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let device_id = schema::object_id(&id)?;
    let data = state
        .provider
        .scoped(|db| async move {
            ops::remove_match(&Repository::new(&db, COLLECTION), doc! { "deviceIdFrom": device_id })
                .await
        })
        .await?;
    Ok(Json(format::ok(data)))
}

/// DELETE /connections/to/{id}
pub async fn to_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let device_id = schema::object_id(&id)?;
    let data = state
        .provider
        .scoped(|db| async move {
            ops::remove_match(&Repository::new(&db, COLLECTION), doc! { "deviceIdTo": device_id })
                .await
        })
        .await?;
    Ok(Json(format::ok(data)))
}

/// DELETE /connections/from/{idFrom}/to/{idTo}
pub async fn between_delete(
    State(state): State<AppState>,
    Path((id_from, id_to)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let from = schema::object_id(&id_from)?;
    let to = schema::object_id(&id_to)?;
    let data = state
        .provider
        .scoped(|db| async move {
            ops::remove_match(
                &Repository::new(&db, COLLECTION),
                doc! { "deviceIdFrom": from, "deviceIdTo": to },
            )
            .await
        })
        .await?;
    Ok(Json(format::ok(data)))
}
