use axum::{
    extract::{Path, State},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, put},
    Extension, Json, Router,
};

use crate::dto::auth_dto::{UpdateProfileRequest, UpdateRoleRequest};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::auth::AuthenticatedUser;
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Gestión de usuarios (solo admin)
pub fn create_user_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id/role", patch(update_user_role))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

/// Perfil del usuario autenticado
pub fn create_profile_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", put(update_profile))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let admin = user.admin_capability()?;
    let users = state.users.list(&admin).await?;
    Ok(Json(users))
}

async fn update_user_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let admin = user.admin_capability()?;
    let updated = state.users.update_role(&admin, &id, request.role).await?;
    Ok(Json(updated))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let updated = state.users.update_profile(user.user_id, request).await?;
    Ok(Json(updated))
}
