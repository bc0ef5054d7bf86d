//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los servicios
//! reciben los repositorios como traits y no conocen el backend concreto.

pub mod auth_service;
pub mod booking_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use booking_service::BookingService;
pub use user_service::UserService;
