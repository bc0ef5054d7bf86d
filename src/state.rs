//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::controllers::car_controller::CarController;
use crate::repositories::{
    BookingRepository, CarRepository, InMemoryBookingRepository, InMemoryCarRepository,
    InMemoryUserRepository, PgBookingRepository, PgCarRepository, PgUserRepository,
    UserRepository,
};
use crate::services::{AuthService, BookingService, UserService};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub bookings: BookingService,
    pub cars: CarController,
    pub auth: AuthService,
    pub users: UserService,
}

impl AppState {
    /// Estado respaldado por PostgreSQL
    pub fn with_database(config: EnvironmentConfig, pool: PgPool) -> Self {
        Self::from_repositories(
            config,
            Arc::new(PgCarRepository::new(pool.clone())),
            Arc::new(PgBookingRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
        )
    }

    /// Estado en memoria; los datos se pierden al reiniciar
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        Self::from_repositories(
            config,
            Arc::new(InMemoryCarRepository::new()),
            Arc::new(InMemoryBookingRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }

    pub fn from_repositories(
        config: EnvironmentConfig,
        cars: Arc<dyn CarRepository>,
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        let jwt = JwtConfig::from(&config);

        Self {
            bookings: BookingService::new(bookings, cars.clone(), users.clone()),
            cars: CarController::new(cars),
            auth: AuthService::new(users.clone(), jwt.clone()),
            users: UserService::new(users),
            jwt,
            config,
        }
    }
}
