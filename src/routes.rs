use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{connections, resources, AppState};

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.cors_origin.as_deref());

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Connection-specific relational routes (before the generic dispatch)
        .merge(connection_routes())
        // Uniform CRUD, dispatched on the resource segment
        .merge(resource_routes())
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:resource",
            get(resources::collection_get)
                .post(resources::collection_post)
                .delete(resources::collection_delete),
        )
        .route(
            "/:resource/:id",
            get(resources::record_get)
                .put(resources::record_put)
                .delete(resources::record_delete),
        )
}

fn connection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/connections/from/:id",
            get(connections::from_get).delete(connections::from_delete),
        )
        .route(
            "/connections/to/:id",
            get(connections::to_get).delete(connections::to_delete),
        )
        .route(
            "/connections/from/:idFrom/to/:idTo",
            get(connections::between_get).delete(connections::between_delete),
        )
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin.and_then(|o| o.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        // No configured domain means development: allow everything
        None => CorsLayer::permissive(),
    }
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Inventory API",
            "version": version,
            "description": "CRUD API for devices, models, floors and connections",
            "resources": [
                "devices", "models", "floors", "connections",
                "attributes", "attributesDictionary", "logs", "users"
            ],
            "endpoints": {
                "collection": "GET|POST|DELETE /{resource}",
                "document": "GET|PUT|DELETE /{resource}/{id}",
                "relational": "GET|DELETE /connections/from/{id}[/to/{id}], /connections/to/{id}",
                "health": "GET /health"
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.provider.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
