use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
    Extension, Json, Router,
};

use crate::dto::booking_dto::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(list_all_bookings))
        .route("/:id/status", patch(update_booking_status))
        .route_layer(from_fn(admin_only_middleware));

    Router::new()
        .route("/", post(create_booking))
        .route("/my-bookings", get(list_my_bookings))
        .route("/:id/cancel", patch(cancel_booking))
        .merge(admin)
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking = state.bookings.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.bookings.list_mine(user.user_id).await?;
    Ok(Json(bookings))
}

async fn list_all_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let admin = user.admin_capability()?;
    let bookings = state.bookings.list_all(&admin).await?;
    Ok(Json(bookings))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let admin = user.admin_capability()?;
    let booking = state.bookings.set_status(&admin, &id, request.status).await?;
    Ok(Json(booking))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.cancel(&id, user.user_id).await?;
    Ok(Json(booking))
}
