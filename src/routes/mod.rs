//! Routers de la API
//!
//! Cada módulo expone un `create_*_router` que se anida bajo `/api`.

pub mod auth_routes;
pub mod booking_routes;
pub mod car_routes;
pub mod user_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes::create_auth_router(state.clone()))
        .nest("/cars", car_routes::create_car_router(state.clone()))
        .nest("/bookings", booking_routes::create_booking_router(state.clone()))
        .nest("/users", user_routes::create_user_router(state.clone()))
        .nest("/profile", user_routes::create_profile_router(state.clone()));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
