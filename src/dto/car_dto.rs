use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::car::{
    CarCategory, CarChanges, FuelType, NewCar, Transmission, DEFAULT_CAR_IMAGE, MAX_PRICE_PER_DAY,
};

fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || value.is_zero() {
        return Err(ValidationError::new("positive_price"));
    }
    if *value > MAX_PRICE_PER_DAY {
        let mut error = ValidationError::new("max_price");
        error.add_param("max".into(), &MAX_PRICE_PER_DAY.to_string());
        return Err(error);
    }
    Ok(())
}

// Request para crear un coche
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    pub category: CarCategory,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_price")]
    pub price_per_day: Decimal,

    #[validate(range(min = 1, max = 60))]
    pub seats: i32,

    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub image: Option<String>,
    pub available: Option<bool>,
    pub features: Option<Vec<String>>,
}

impl From<CreateCarRequest> for NewCar {
    fn from(request: CreateCarRequest) -> Self {
        Self {
            brand: request.brand,
            model: request.model,
            year: request.year,
            category: request.category,
            price_per_day: request.price_per_day,
            seats: request.seats,
            transmission: request.transmission,
            fuel_type: request.fuel_type,
            image: request
                .image
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CAR_IMAGE.to_string()),
            available: request.available.unwrap_or(true),
            features: request.features.unwrap_or_default(),
        }
    }
}

// Request para actualizar un coche (todos los campos opcionales)
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    pub category: Option<CarCategory>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom = "validate_price")]
    pub price_per_day: Option<Decimal>,

    #[validate(range(min = 1, max = 60))]
    pub seats: Option<i32>,

    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    pub image: Option<String>,
    pub available: Option<bool>,
    pub features: Option<Vec<String>>,
}

impl From<UpdateCarRequest> for CarChanges {
    fn from(request: UpdateCarRequest) -> Self {
        Self {
            brand: request.brand,
            model: request.model,
            year: request.year,
            category: request.category,
            price_per_day: request.price_per_day,
            seats: request.seats,
            transmission: request.transmission,
            fuel_type: request.fuel_type,
            image: request.image,
            available: request.available,
            features: request.features,
        }
    }
}

// Query para presupuestar un alquiler
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub start_date: String,
    pub end_date: String,
}

// Response del presupuesto
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub car_id: Uuid,
    pub days: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_day: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateCarRequest = serde_json::from_value(json!({
            "brand": "Tesla",
            "model": "Model 3",
            "year": 2023,
            "category": "Luxury",
            "pricePerDay": 120,
            "seats": 5,
            "transmission": "Automatic",
            "fuelType": "Electric"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let car = NewCar::from(request);
        assert!(car.available);
        assert_eq!(car.image, DEFAULT_CAR_IMAGE);
        assert!(car.features.is_empty());
        assert_eq!(car.price_per_day, Decimal::from(120));
    }

    #[test]
    fn test_create_request_rejects_zero_price() {
        let request: CreateCarRequest = serde_json::from_value(json!({
            "brand": "Fiat",
            "model": "Panda",
            "year": 2019,
            "category": "Economy",
            "pricePerDay": 0,
            "seats": 4,
            "transmission": "Manual",
            "fuelType": "Petrol"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_price_is_capped_at_column_range() {
        let at_cap = UpdateCarRequest {
            price_per_day: Some(MAX_PRICE_PER_DAY),
            ..Default::default()
        };
        assert!(at_cap.validate().is_ok());

        let request: UpdateCarRequest =
            serde_json::from_value(json!({ "pricePerDay": 1e25 })).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price_per_day"));
        assert_eq!(MAX_PRICE_PER_DAY.to_string(), "9999999999.99");
    }

    #[test]
    fn test_update_request_is_partial() {
        let request: UpdateCarRequest =
            serde_json::from_value(json!({ "available": false })).unwrap();
        assert!(request.validate().is_ok());

        let changes = CarChanges::from(request);
        assert_eq!(changes.available, Some(false));
        assert!(changes.price_per_day.is_none());
    }
}
