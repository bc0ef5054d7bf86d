//! Identidad y roles
//!
//! Tipos que representan al usuario autenticado y los permisos que
//! el núcleo de reservas acepta sin volver a verificar.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Roles del sistema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Client,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "client" => Some(UserRole::Client),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user_id
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

/// Prueba de que quien llama es administrador.
///
/// Solo se construye desde [`AuthenticatedUser::admin_capability`], así que
/// las operaciones que la reciben no necesitan repetir la comprobación.
#[derive(Debug, Clone, Copy)]
pub struct AdminCapability {
    _private: (),
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Obtener la capacidad de administrador o `Forbidden`
    pub fn admin_capability(&self) -> AppResult<AdminCapability> {
        if self.is_admin() {
            Ok(AdminCapability { _private: () })
        } else {
            Err(AppError::Forbidden("Access denied. Admin only.".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Client, UserRole::Admin] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("superuser"), None);
    }

    #[test]
    fn test_admin_capability_only_for_admins() {
        assert!(user_with(UserRole::Admin).admin_capability().is_ok());
        assert!(matches!(
            user_with(UserRole::Client).admin_capability(),
            Err(AppError::Forbidden(_))
        ));
    }
}
