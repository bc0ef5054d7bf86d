//! Servicio de autenticación
//!
//! Registro y login con contraseñas bcrypt; emite el JWT que el
//! middleware de autenticación verifica en cada request.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::auth::UserRole;
use crate::models::user::{NewUser, User, UserResponse};
use crate::repositories::UserRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Registrar un cliente nuevo y devolver su token
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hasheando contraseña: {}", e)))?;

        let user = self
            .users
            .create(NewUser {
                name: request.name.trim().to_string(),
                email,
                phone: request.phone.trim().to_string(),
                password_hash,
                role: UserRole::Client,
            })
            .await?;

        info!("👤 Usuario registrado: {}", user.email);
        self.auth_response(user)
    }

    /// Login con email y contraseña
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("🔒 Login fallido para {}", email);
            return Err(invalid());
        };

        let matches = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verificando contraseña: {}", e)))?;
        if !matches {
            warn!("🔒 Login fallido para {}", email);
            return Err(invalid());
        }

        info!("🔑 Login correcto: {}", user.email);
        self.auth_response(user)
    }

    /// Perfil del usuario autenticado
    pub async fn me(&self, user_id: Uuid) -> AppResult<UserResponse> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| not_found_error("User"))
    }

    fn auth_response(&self, user: User) -> AppResult<AuthResponse> {
        let token = generate_token(user.id, &user.email, user.role, &self.jwt)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
