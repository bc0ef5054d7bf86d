//! Repositorios
//!
//! Contratos de persistencia usados por los servicios, con una implementación
//! PostgreSQL (sqlx) y otra en memoria para desarrollo y tests.

pub mod booking_repository;
pub mod car_repository;
pub mod memory;
pub mod user_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    auth::UserRole,
    booking::{Booking, BookingStatus},
    car::{Car, CarChanges, CarFilters, NewCar},
    user::{NewUser, User},
};
use crate::utils::errors::AppResult;

pub use booking_repository::PgBookingRepository;
pub use car_repository::PgCarRepository;
pub use memory::{InMemoryBookingRepository, InMemoryCarRepository, InMemoryUserRepository};
pub use user_repository::PgUserRepository;

#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn create(&self, car: NewCar) -> AppResult<Car>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Car>>;
    /// Coches que cumplen los filtros, más recientes primero
    async fn list(&self, filters: &CarFilters) -> AppResult<Vec<Car>>;
    async fn update(&self, id: Uuid, changes: CarChanges) -> AppResult<Option<Car>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: Booking) -> AppResult<Booking>;
    /// Solo devuelve la reserva si pertenece a `user_id`
    async fn find_by_id_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Booking>>;
    /// Reservas del usuario, más recientes primero
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>>;
    /// Todas las reservas, más recientes primero
    async fn list_all(&self) -> AppResult<Vec<Booking>>;
    /// Sobrescribe el estado sin condiciones
    async fn set_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Option<Booking>>;
    /// Cambia el estado solo si el actual es `expected`; `None` si no se escribió nada
    async fn transition_status(
        &self,
        id: Uuid,
        user_id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> AppResult<Option<Booking>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> AppResult<User>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;
    async fn list_all(&self) -> AppResult<Vec<User>>;
    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>>;
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<Option<User>>;
}
