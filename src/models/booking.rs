//! Modelo de Booking
//!
//! Reserva de un coche por un usuario, con su precio calculado y su estado.
//! Incluye la aritmética de precio compartida por la creación de reservas
//! y por el presupuesto previo que muestra el cliente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// El propietario solo puede cancelar mientras la reserva está pendiente
    pub fn can_be_cancelled_by_owner(&self) -> bool {
        matches!(self, BookingStatus::Pending)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking principal - mapea a la tabla bookings
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Construir una reserva nueva en estado `pending`
    pub fn new_pending(
        user_id: Uuid,
        car_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        total_price: Decimal,
        pickup_location: String,
        dropoff_location: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            car_id,
            start_date,
            end_date,
            total_price,
            pickup_location,
            dropoff_location,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Días facturables: `ceil((end - start) / 1 día)`.
///
/// Puede ser cero o negativo si las fechas vienen invertidas.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    let whole = millis / MILLIS_PER_DAY;
    // la división entera trunca hacia cero, que ya es el techo para negativos
    if millis % MILLIS_PER_DAY > 0 {
        whole + 1
    } else {
        whole
    }
}

/// Mayor total que cabe en `bookings.total_price` (NUMERIC(20,2))
pub const MAX_TOTAL_PRICE: Decimal = Decimal::from_parts(1_661_992_959, 1_808_227_885, 5, false, 2);

/// Precio total guardado en la reserva: días × precio por día, sin mínimo.
///
/// Falla con `BadRequest` si el resultado no cabe en la columna.
pub fn compute_total_price(
    price_per_day: Decimal,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<Decimal> {
    Decimal::from(rental_days(start, end))
        .checked_mul(price_per_day)
        .filter(|total| total.abs() <= MAX_TOTAL_PRICE)
        .ok_or_else(|| AppError::BadRequest("Total price out of range".to_string()))
}

/// Presupuesto previo para el cliente; los periodos no positivos cuestan 0
pub fn preview_total_price(
    price_per_day: Decimal,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<Decimal> {
    let total = compute_total_price(price_per_day, start, end)?;
    Ok(total.max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_three_day_rental_at_fifty() {
        let total = compute_total_price(Decimal::from(50), day(2024, 1, 1), day(2024, 1, 4)).unwrap();
        assert_eq!(total, Decimal::from(150));
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let start = day(2024, 1, 1);
        let end = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 1).unwrap();
        assert_eq!(rental_days(start, end), 2);
    }

    #[test]
    fn test_same_day_is_zero() {
        let start = day(2024, 1, 1);
        assert_eq!(rental_days(start, start), 0);
        assert_eq!(compute_total_price(Decimal::from(50), start, start).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_reversed_dates_give_negative_price() {
        let total = compute_total_price(Decimal::from(50), day(2024, 1, 4), day(2024, 1, 1)).unwrap();
        assert_eq!(total, Decimal::from(-150));
    }

    #[test]
    fn test_reversed_partial_day_rounds_toward_zero() {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let end = day(2024, 1, 1);
        // -1.5 días -> ceil = -1
        assert_eq!(rental_days(start, end), -1);
    }

    #[test]
    fn test_preview_floors_at_zero() {
        let preview = preview_total_price(Decimal::from(50), day(2024, 1, 4), day(2024, 1, 1)).unwrap();
        assert_eq!(preview, Decimal::ZERO);
        let preview = preview_total_price(Decimal::new(4999, 2), day(2024, 1, 1), day(2024, 1, 3)).unwrap();
        assert_eq!(preview, Decimal::new(9998, 2));
    }

    #[test]
    fn test_max_total_matches_column() {
        assert_eq!(MAX_TOTAL_PRICE.to_string(), "999999999999999999.99");
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let start = day(1, 1, 1);
        let end = day(9999, 12, 31);

        let err = compute_total_price(Decimal::MAX, start, end).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Total price out of range"));

        // cabe en Decimal pero no en la columna
        let err = compute_total_price(Decimal::from_i128_with_scale(10_i128.pow(20), 0), start, end).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(preview_total_price(Decimal::MAX, start, end).is_err());

        // el mayor precio por día admitido cabe incluso con el rango de fechas completo
        let widest = compute_total_price(Decimal::new(999_999_999_999, 2), start, end).unwrap();
        assert!(widest <= MAX_TOTAL_PRICE);
    }

    #[test]
    fn test_new_booking_is_pending() {
        let booking = Booking::new_pending(
            Uuid::new_v4(),
            Uuid::new_v4(),
            day(2024, 1, 1),
            day(2024, 1, 4),
            Decimal::from(150),
            "Airport".to_string(),
            "Downtown".to_string(),
        );
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(booking.status.can_be_cancelled_by_owner());
        assert!(!BookingStatus::Confirmed.can_be_cancelled_by_owner());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&BookingStatus::Confirmed).unwrap(), "\"confirmed\"");
        let status: BookingStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, BookingStatus::Completed);
    }
}
