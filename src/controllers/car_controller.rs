use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::car_dto::{CreateCarRequest, QuoteQuery, QuoteResponse, UpdateCarRequest};
use crate::models::auth::AdminCapability;
use crate::models::booking::{preview_total_price, rental_days};
use crate::models::car::{Car, CarFilters};
use crate::repositories::CarRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{parse_booking_date, parse_resource_id};

#[derive(Clone)]
pub struct CarController {
    repository: Arc<dyn CarRepository>,
}

impl CarController {
    pub fn new(repository: Arc<dyn CarRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, filters: CarFilters) -> AppResult<Vec<Car>> {
        self.repository.list(&filters).await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Car> {
        let id = parse_resource_id(id, "Car")?;
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car"))
    }

    pub async fn create(&self, _admin: &AdminCapability, request: CreateCarRequest) -> AppResult<Car> {
        // Validar campos
        request.validate()?;

        let car = self.repository.create(request.into()).await?;
        info!("🚗 Coche creado: {} {} ({})", car.brand, car.model, car.id);
        Ok(car)
    }

    pub async fn update(
        &self,
        _admin: &AdminCapability,
        id: &str,
        request: UpdateCarRequest,
    ) -> AppResult<Car> {
        request.validate()?;

        let id = parse_resource_id(id, "Car")?;
        let car = self
            .repository
            .update(id, request.into())
            .await?
            .ok_or_else(|| not_found_error("Car"))?;

        info!("✏️ Coche actualizado: {}", car.id);
        Ok(car)
    }

    /// Eliminar un coche; las reservas existentes lo conservan como referencia
    pub async fn delete(&self, _admin: &AdminCapability, id: &str) -> AppResult<()> {
        let id = parse_resource_id(id, "Car")?;
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Car"));
        }

        info!("🗑️ Coche eliminado: {}", id);
        Ok(())
    }

    /// Presupuesto de un alquiler sin crear la reserva
    pub async fn quote(&self, id: &str, query: QuoteQuery) -> AppResult<QuoteResponse> {
        let car = self.get_by_id(id).await?;

        let start = parse_booking_date(&query.start_date)
            .map_err(|_| AppError::BadRequest(format!("Invalid startDate '{}'", query.start_date)))?;
        let end = parse_booking_date(&query.end_date)
            .map_err(|_| AppError::BadRequest(format!("Invalid endDate '{}'", query.end_date)))?;

        Ok(QuoteResponse {
            car_id: car.id,
            days: rental_days(start, end).max(0),
            price_per_day: car.price_per_day,
            total_price: preview_total_price(car.price_per_day, start, end)?,
        })
    }
}
