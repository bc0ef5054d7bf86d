use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::{Booking, BookingStatus};
use crate::models::car::Car;
use crate::models::user::UserSummary;
use crate::utils::validation::{deserialize_booking_date, validate_not_empty};

// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    // se mantiene como texto: un id mal formado es "coche no encontrado"
    pub car_id: String,
    #[serde(deserialize_with = "deserialize_booking_date")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_booking_date")]
    pub end_date: DateTime<Utc>,
    #[validate(custom = "validate_not_empty")]
    pub pickup_location: String,
    #[validate(custom = "validate_not_empty")]
    pub dropoff_location: String,
}

// Request de administrador para cambiar el estado
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

// Response de reserva con el coche (y el propietario en listados de admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    pub car_id: Uuid,
    pub car: Option<Car>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl BookingResponse {
    pub fn new(booking: Booking, car: Option<Car>, user: Option<UserSummary>) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            user,
            car_id: booking.car_id,
            car,
            start_date: booking.start_date,
            end_date: booking.end_date,
            total_price: booking.total_price,
            pickup_location: booking.pickup_location,
            dropoff_location: booking.dropoff_location,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}
