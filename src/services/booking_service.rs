//! Servicio de reservas
//!
//! Ciclo de vida de una reserva: creación con precio calculado, listados
//! enriquecidos con coche y propietario, cambio de estado por un
//! administrador y cancelación por el propietario.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{BookingResponse, CreateBookingRequest};
use crate::models::auth::AdminCapability;
use crate::models::booking::{compute_total_price, Booking, BookingStatus};
use crate::models::car::Car;
use crate::models::user::UserSummary;
use crate::repositories::{BookingRepository, CarRepository, UserRepository};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::parse_resource_id;

#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    cars: Arc<dyn CarRepository>,
    users: Arc<dyn UserRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        cars: Arc<dyn CarRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { bookings, cars, users }
    }

    /// Crear una reserva `pending` para `user_id`.
    ///
    /// El precio se fija en este momento: `ceil(días) × precio por día`, sin
    /// mínimo. Las fechas invertidas producen un total negativo.
    pub async fn create(&self, user_id: Uuid, request: CreateBookingRequest) -> AppResult<BookingResponse> {
        request.validate()?;

        let car_id = parse_resource_id(&request.car_id, "Car")?;
        let car = self
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| not_found_error("Car"))?;

        if !car.available {
            warn!("⚠️ Reserva rechazada: coche {} no disponible", car.id);
            return Err(AppError::InvalidState("Car is not available".to_string()));
        }

        let total_price = compute_total_price(car.price_per_day, request.start_date, request.end_date)?;
        let booking = Booking::new_pending(
            user_id,
            car.id,
            request.start_date,
            request.end_date,
            total_price,
            request.pickup_location,
            request.dropoff_location,
        );

        let booking = self.bookings.insert(booking).await?;
        info!(
            "✅ Reserva {} creada por {} (coche {}, total {})",
            booking.id, user_id, car.id, booking.total_price
        );

        Ok(BookingResponse::new(booking, Some(car), None))
    }

    /// Reservas del usuario, más recientes primero
    pub async fn list_mine(&self, user_id: Uuid) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.bookings.list_by_user(user_id).await?;
        let cars = self.cars_by_id(&bookings).await?;

        Ok(bookings
            .into_iter()
            .map(|booking| {
                let car = cars.get(&booking.car_id).cloned();
                BookingResponse::new(booking, car, None)
            })
            .collect())
    }

    /// Todas las reservas con coche y propietario
    pub async fn list_all(&self, _admin: &AdminCapability) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.bookings.list_all().await?;
        let cars = self.cars_by_id(&bookings).await?;
        let owners = self.owners_by_id(&bookings).await?;

        Ok(bookings
            .into_iter()
            .map(|booking| {
                let car = cars.get(&booking.car_id).cloned();
                let user = owners.get(&booking.user_id).cloned();
                BookingResponse::new(booking, car, user)
            })
            .collect())
    }

    /// Sobrescribir el estado sin comprobar la transición
    pub async fn set_status(
        &self,
        _admin: &AdminCapability,
        booking_id: &str,
        status: BookingStatus,
    ) -> AppResult<BookingResponse> {
        let booking_id = parse_resource_id(booking_id, "Booking")?;
        let booking = self
            .bookings
            .set_status(booking_id, status)
            .await?
            .ok_or_else(|| not_found_error("Booking"))?;

        info!("🔄 Reserva {} pasa a {}", booking.id, status);
        self.enrich_one(booking).await
    }

    /// Cancelar una reserva propia mientras siga `pending`.
    ///
    /// Una reserva ajena responde igual que una inexistente.
    pub async fn cancel(&self, booking_id: &str, user_id: Uuid) -> AppResult<BookingResponse> {
        let booking_id = parse_resource_id(booking_id, "Booking")?;
        let booking = self
            .bookings
            .find_by_id_for_user(booking_id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Booking"))?;

        if !booking.status.can_be_cancelled_by_owner() {
            warn!(
                "⚠️ Cancelación rechazada: reserva {} en estado {}",
                booking.id, booking.status
            );
            return Err(AppError::InvalidState("Cannot cancel this booking".to_string()));
        }

        // el estado puede haber cambiado desde la lectura
        let cancelled = self
            .bookings
            .transition_status(booking.id, user_id, BookingStatus::Pending, BookingStatus::Cancelled)
            .await?
            .ok_or_else(|| {
                warn!("⚠️ Cancelación rechazada: reserva {} cambió de estado", booking.id);
                AppError::InvalidState("Cannot cancel this booking".to_string())
            })?;

        info!("🚫 Reserva {} cancelada por {}", cancelled.id, user_id);

        let car = self.cars.find_by_id(cancelled.car_id).await?;
        Ok(BookingResponse::new(cancelled, car, None))
    }

    async fn enrich_one(&self, booking: Booking) -> AppResult<BookingResponse> {
        let car = self.cars.find_by_id(booking.car_id).await?;
        let user = self
            .users
            .find_by_id(booking.user_id)
            .await?
            .map(|user| UserSummary::from(&user));

        Ok(BookingResponse::new(booking, car, user))
    }

    async fn cars_by_id(&self, bookings: &[Booking]) -> AppResult<HashMap<Uuid, Car>> {
        let mut ids: Vec<Uuid> = bookings.iter().map(|b| b.car_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let cars = self.cars.find_by_ids(&ids).await?;
        Ok(cars.into_iter().map(|car| (car.id, car)).collect())
    }

    async fn owners_by_id(&self, bookings: &[Booking]) -> AppResult<HashMap<Uuid, UserSummary>> {
        let mut ids: Vec<Uuid> = bookings.iter().map(|b| b.user_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let users = self.users.find_by_ids(&ids).await?;
        Ok(users
            .iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{AuthenticatedUser, UserRole};
    use crate::models::car::{CarChanges, CarCategory, FuelType, NewCar, Transmission};
    use crate::models::user::NewUser;
    use crate::repositories::{InMemoryBookingRepository, InMemoryCarRepository, InMemoryUserRepository};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    struct Fixture {
        service: BookingService,
        cars: Arc<InMemoryCarRepository>,
        users: Arc<InMemoryUserRepository>,
    }

    fn fixture() -> Fixture {
        let cars = Arc::new(InMemoryCarRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let service = BookingService::new(
            Arc::new(InMemoryBookingRepository::new()),
            cars.clone(),
            users.clone(),
        );
        Fixture { service, cars, users }
    }

    fn admin() -> AdminCapability {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            role: UserRole::Admin,
        }
        .admin_capability()
        .unwrap()
    }

    async fn add_car(fx: &Fixture, price: i64, available: bool) -> Car {
        fx.cars
            .create(NewCar {
                brand: "Toyota".to_string(),
                model: "Corolla".to_string(),
                year: 2022,
                category: CarCategory::Compact,
                price_per_day: Decimal::from(price),
                seats: 5,
                transmission: Transmission::Automatic,
                fuel_type: FuelType::Petrol,
                image: "car.png".to_string(),
                available,
                features: vec![],
            })
            .await
            .unwrap()
    }

    async fn add_user(fx: &Fixture, email: &str) -> Uuid {
        fx.users
            .create(NewUser {
                name: "Ana".to_string(),
                email: email.to_string(),
                phone: "600123123".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Client,
            })
            .await
            .unwrap()
            .id
    }

    fn request(car_id: &str, start: (u32, u32), end: (u32, u32)) -> CreateBookingRequest {
        CreateBookingRequest {
            car_id: car_id.to_string(),
            start_date: Utc.with_ymd_and_hms(2024, start.0, start.1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, end.0, end.1, 0, 0, 0).unwrap(),
            pickup_location: "Airport".to_string(),
            dropoff_location: "Downtown".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_prices_three_days() {
        let fx = fixture();
        let car = add_car(&fx, 50, true).await;
        let user_id = Uuid::new_v4();

        let booking = fx
            .service
            .create(user_id, request(&car.id.to_string(), (1, 1), (1, 4)))
            .await
            .unwrap();

        assert_eq!(booking.total_price, Decimal::from(150));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.user_id, user_id);
        assert_eq!(booking.car.as_ref().map(|c| c.id), Some(car.id));
    }

    #[tokio::test]
    async fn test_create_with_reversed_dates_stores_negative_total() {
        let fx = fixture();
        let car = add_car(&fx, 50, true).await;

        let booking = fx
            .service
            .create(Uuid::new_v4(), request(&car.id.to_string(), (1, 4), (1, 1)))
            .await
            .unwrap();

        assert_eq!(booking.total_price, Decimal::from(-150));
    }

    #[tokio::test]
    async fn test_create_unknown_or_malformed_car_is_not_found() {
        let fx = fixture();
        for car_id in [Uuid::new_v4().to_string(), "not-an-id".to_string()] {
            let err = fx
                .service
                .create(Uuid::new_v4(), request(&car_id, (1, 1), (1, 4)))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::NotFound(msg) if msg == "Car not found"));
        }
    }

    #[tokio::test]
    async fn test_create_unavailable_car_is_rejected() {
        let fx = fixture();
        let car = add_car(&fx, 50, false).await;

        let err = fx
            .service
            .create(Uuid::new_v4(), request(&car.id.to_string(), (1, 1), (1, 4)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(msg) if msg == "Car is not available"));
        assert!(fx.service.list_all(&admin()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_locations() {
        let fx = fixture();
        let car = add_car(&fx, 50, true).await;
        let mut req = request(&car.id.to_string(), (1, 1), (1, 4));
        req.pickup_location = "  ".to_string();

        let err = fx.service.create(Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_with_out_of_range_total_is_rejected() {
        let fx = fixture();
        let car = add_car(&fx, 50, true).await;
        // precio almacenado fuera de la validación de la API
        let changes = CarChanges {
            price_per_day: Some(Decimal::MAX),
            ..Default::default()
        };
        fx.cars.update(car.id, changes).await.unwrap();

        let req = CreateBookingRequest {
            car_id: car.id.to_string(),
            start_date: Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(9999, 12, 31, 0, 0, 0).unwrap(),
            pickup_location: "Airport".to_string(),
            dropoff_location: "Downtown".to_string(),
        };
        let err = fx.service.create(Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Total price out of range"));
        assert!(fx.service.list_all(&admin()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_price_is_frozen_after_car_price_change() {
        let fx = fixture();
        let car = add_car(&fx, 50, true).await;
        let user_id = Uuid::new_v4();
        fx.service
            .create(user_id, request(&car.id.to_string(), (1, 1), (1, 4)))
            .await
            .unwrap();

        let changes = CarChanges {
            price_per_day: Some(Decimal::from(80)),
            ..Default::default()
        };
        fx.cars.update(car.id, changes).await.unwrap();

        let mine = fx.service.list_mine(user_id).await.unwrap();
        assert_eq!(mine[0].total_price, Decimal::from(150));
        assert_eq!(mine[0].car.as_ref().unwrap().price_per_day, Decimal::from(80));
    }

    #[tokio::test]
    async fn test_list_mine_only_returns_own_bookings_newest_first() {
        let fx = fixture();
        let car = add_car(&fx, 30, true).await;
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        let first = fx.service.create(alice, request(&car.id.to_string(), (1, 1), (1, 2))).await.unwrap();
        fx.service.create(bob, request(&car.id.to_string(), (1, 1), (1, 2))).await.unwrap();
        let second = fx.service.create(alice, request(&car.id.to_string(), (2, 1), (2, 2))).await.unwrap();

        let mine = fx.service.list_mine(alice).await.unwrap();
        let ids: Vec<Uuid> = mine.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(mine.iter().all(|b| b.user.is_none()));
    }

    #[tokio::test]
    async fn test_list_all_includes_owner_summary() {
        let fx = fixture();
        let car = add_car(&fx, 30, true).await;
        let owner = add_user(&fx, "ana@example.com").await;
        fx.service.create(owner, request(&car.id.to_string(), (1, 1), (1, 2))).await.unwrap();

        let all = fx.service.list_all(&admin()).await.unwrap();
        assert_eq!(all.len(), 1);
        let summary = all[0].user.as_ref().unwrap();
        assert_eq!(summary.email, "ana@example.com");
        assert_eq!(summary.phone, "600123123");
    }

    #[tokio::test]
    async fn test_deleted_car_leaves_booking_without_car() {
        let fx = fixture();
        let car = add_car(&fx, 30, true).await;
        let user_id = Uuid::new_v4();
        fx.service.create(user_id, request(&car.id.to_string(), (1, 1), (1, 2))).await.unwrap();
        fx.cars.delete(car.id).await.unwrap();

        let mine = fx.service.list_mine(user_id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(mine[0].car.is_none());
        assert_eq!(mine[0].car_id, car.id);
    }

    #[tokio::test]
    async fn test_cancel_pending_booking() {
        let fx = fixture();
        let car = add_car(&fx, 30, true).await;
        let user_id = Uuid::new_v4();
        let booking = fx.service.create(user_id, request(&car.id.to_string(), (1, 1), (1, 2))).await.unwrap();

        let cancelled = fx.service.cancel(&booking.id.to_string(), user_id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        // una segunda cancelación ya no es válida
        let err = fx.service.cancel(&booking.id.to_string(), user_id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(msg) if msg == "Cannot cancel this booking"));
    }

    #[tokio::test]
    async fn test_cancel_confirmed_booking_is_rejected() {
        let fx = fixture();
        let car = add_car(&fx, 30, true).await;
        let user_id = Uuid::new_v4();
        let booking = fx.service.create(user_id, request(&car.id.to_string(), (1, 1), (1, 2))).await.unwrap();
        let id = booking.id.to_string();

        fx.service.set_status(&admin(), &id, BookingStatus::Confirmed).await.unwrap();

        let err = fx.service.cancel(&id, user_id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        let all = fx.service.list_all(&admin()).await.unwrap();
        assert_eq!(all[0].status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_cancel_foreign_booking_looks_missing() {
        let fx = fixture();
        let car = add_car(&fx, 30, true).await;
        let booking = fx
            .service
            .create(Uuid::new_v4(), request(&car.id.to_string(), (1, 1), (1, 2)))
            .await
            .unwrap();

        let foreign = fx.service.cancel(&booking.id.to_string(), Uuid::new_v4()).await.unwrap_err();
        let missing = fx.service.cancel(&Uuid::new_v4().to_string(), Uuid::new_v4()).await.unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());
        assert!(matches!(foreign, AppError::NotFound(msg) if msg == "Booking not found"));

        let all = fx.service.list_all(&admin()).await.unwrap();
        assert_eq!(all[0].status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_set_status_allows_any_transition() {
        let fx = fixture();
        let car = add_car(&fx, 30, true).await;
        let owner = add_user(&fx, "ana@example.com").await;
        let booking = fx.service.create(owner, request(&car.id.to_string(), (1, 1), (1, 2))).await.unwrap();
        let id = booking.id.to_string();

        let cancelled = fx.service.set_status(&admin(), &id, BookingStatus::Cancelled).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let revived = fx.service.set_status(&admin(), &id, BookingStatus::Pending).await.unwrap();
        assert_eq!(revived.status, BookingStatus::Pending);
        assert_eq!(revived.user.unwrap().email, "ana@example.com");

        // mismo estado: no-op sin error
        let same = fx.service.set_status(&admin(), &id, BookingStatus::Pending).await.unwrap();
        assert_eq!(same.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_set_status_unknown_booking() {
        let fx = fixture();
        for id in [Uuid::new_v4().to_string(), "garbage".to_string()] {
            let err = fx.service.set_status(&admin(), &id, BookingStatus::Confirmed).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(msg) if msg == "Booking not found"));
        }
    }
}
