//! Middleware de autenticación JWT
//!
//! Este módulo maneja la extracción y verificación del token bearer y la
//! inyección del usuario autenticado en las requests.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::{
    models::auth::AuthenticatedUser,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{authenticated_user_from_claims, extract_token_from_header, verify_token},
    },
};

/// Middleware de autenticación JWT.
///
/// El rol del token se acepta tal cual, sin consultar la base de datos.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("No token, authorization denied".to_string()))?;
    let token = extract_token_from_header(auth_header)?;

    let claims = verify_token(token, &state.jwt)?;
    let user = authenticated_user_from_claims(claims)?;

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    user.admin_capability()?;
    Ok(next.run(request).await)
}
