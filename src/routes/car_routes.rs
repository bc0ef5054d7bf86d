use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::dto::car_dto::{CreateCarRequest, QuoteQuery, QuoteResponse, UpdateCarRequest};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::auth::AuthenticatedUser;
use crate::models::car::{Car, CarFilters};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_car))
        .route("/:id", put(update_car).delete(delete_car))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_cars))
        .route("/:id", get(get_car))
        .route("/:id/quote", get(quote_car))
        .merge(admin)
}

async fn list_cars(
    State(state): State<AppState>,
    Query(filters): Query<CarFilters>,
) -> Result<Json<Vec<Car>>, AppError> {
    let cars = state.cars.list(filters).await?;
    Ok(Json(cars))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Car>, AppError> {
    let car = state.cars.get_by_id(&id).await?;
    Ok(Json(car))
}

async fn quote_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>, AppError> {
    let quote = state.cars.quote(&id, query).await?;
    Ok(Json(quote))
}

async fn create_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<Car>), AppError> {
    let admin = user.admin_capability()?;
    let car = state.cars.create(&admin, request).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

async fn update_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<Car>, AppError> {
    let admin = user.admin_capability()?;
    let car = state.cars.update(&admin, &id, request).await?;
    Ok(Json(car))
}

async fn delete_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let admin = user.admin_capability()?;
    state.cars.delete(&admin, &id).await?;
    Ok(Json(serde_json::json!({
        "message": "Car deleted successfully"
    })))
}
