//! Backend de alquiler de coches
//!
//! API HTTP (axum) para catálogo de coches, usuarios y el ciclo de vida
//! de las reservas.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;
