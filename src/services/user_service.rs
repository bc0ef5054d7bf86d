//! Servicio de usuarios
//!
//! Gestión de usuarios por el administrador y edición del perfil propio.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::UpdateProfileRequest;
use crate::models::auth::{AdminCapability, UserRole};
use crate::models::user::UserResponse;
use crate::repositories::UserRepository;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::parse_resource_id;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn list(&self, _admin: &AdminCapability) -> AppResult<Vec<UserResponse>> {
        let users = self.users.list_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update_role(
        &self,
        _admin: &AdminCapability,
        user_id: &str,
        role: UserRole,
    ) -> AppResult<UserResponse> {
        let user_id = parse_resource_id(user_id, "User")?;
        let user = self
            .users
            .update_role(user_id, role)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        info!("🛡️ Rol de {} cambiado a {}", user.email, role.as_str());
        Ok(UserResponse::from(user))
    }

    /// Actualizar nombre y/o teléfono del propio usuario
    pub async fn update_profile(&self, user_id: Uuid, request: UpdateProfileRequest) -> AppResult<UserResponse> {
        request.validate()?;

        let name = request.name.map(|n| n.trim().to_string());
        let phone = request.phone.map(|p| p.trim().to_string());

        self.users
            .update_profile(user_id, name, phone)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| not_found_error("User"))
    }
}
