//! Modelo de Car
//!
//! Este módulo contiene el struct Car del catálogo y sus enums.
//! Mapea a la tabla cars y a los ENUM de PostgreSQL del mismo nombre.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Imagen usada cuando un coche se crea sin `image`
pub const DEFAULT_CAR_IMAGE: &str = "https://via.placeholder.com/400x300?text=Car+Image";

/// Mayor precio por día que cabe en `cars.price_per_day` (NUMERIC(12,2))
pub const MAX_PRICE_PER_DAY: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Categoría del coche - mapea al ENUM car_category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "car_category")]
pub enum CarCategory {
    Economy,
    Compact,
    #[sqlx(rename = "SUV")]
    #[serde(rename = "SUV")]
    Suv,
    Luxury,
    Van,
}

/// Tipo de transmisión - mapea al ENUM car_transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "car_transmission")]
pub enum Transmission {
    Automatic,
    Manual,
}

/// Combustible - mapea al ENUM car_fuel_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "car_fuel_type")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

/// Car principal - mapea a la tabla cars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub category: CarCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_day: Decimal,
    pub seats: i32,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub image: String,
    pub available: bool,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Datos para insertar un coche nuevo
#[derive(Debug, Clone)]
pub struct NewCar {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub category: CarCategory,
    pub price_per_day: Decimal,
    pub seats: i32,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub image: String,
    pub available: bool,
    pub features: Vec<String>,
}

/// Cambios parciales sobre un coche existente
#[derive(Debug, Clone, Default)]
pub struct CarChanges {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub category: Option<CarCategory>,
    pub price_per_day: Option<Decimal>,
    pub seats: Option<i32>,
    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    pub image: Option<String>,
    pub available: Option<bool>,
    pub features: Option<Vec<String>>,
}

impl CarChanges {
    /// Aplicar los cambios sobre una copia del coche
    pub fn apply(self, car: &Car) -> Car {
        Car {
            id: car.id,
            brand: self.brand.unwrap_or_else(|| car.brand.clone()),
            model: self.model.unwrap_or_else(|| car.model.clone()),
            year: self.year.unwrap_or(car.year),
            category: self.category.unwrap_or(car.category),
            price_per_day: self.price_per_day.unwrap_or(car.price_per_day),
            seats: self.seats.unwrap_or(car.seats),
            transmission: self.transmission.unwrap_or(car.transmission),
            fuel_type: self.fuel_type.unwrap_or(car.fuel_type),
            image: self.image.unwrap_or_else(|| car.image.clone()),
            available: self.available.unwrap_or(car.available),
            features: self.features.unwrap_or_else(|| car.features.clone()),
            created_at: car.created_at,
        }
    }
}

/// Filtros para búsqueda de coches
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarFilters {
    pub category: Option<CarCategory>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub available: Option<bool>,
}

impl CarFilters {
    pub fn matches(&self, car: &Car) -> bool {
        self.category.map_or(true, |c| car.category == c)
            && self.available.map_or(true, |a| car.available == a)
            && self.min_price.map_or(true, |min| car.price_per_day >= min)
            && self.max_price.map_or(true, |max| car.price_per_day <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_car() -> Car {
        Car {
            id: Uuid::new_v4(),
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2022,
            category: CarCategory::Compact,
            price_per_day: Decimal::from(50),
            seats: 5,
            transmission: Transmission::Automatic,
            fuel_type: FuelType::Hybrid,
            image: DEFAULT_CAR_IMAGE.to_string(),
            available: true,
            features: vec!["Bluetooth".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_car_serializes_camel_case_with_numeric_price() {
        let json = serde_json::to_value(sample_car()).unwrap();
        assert_eq!(json["pricePerDay"], serde_json::json!(50.0));
        assert_eq!(json["fuelType"], "Hybrid");
        assert_eq!(json["category"], "Compact");
        assert!(json.get("price_per_day").is_none());
    }

    #[test]
    fn test_suv_category_wire_name() {
        let category: CarCategory = serde_json::from_str("\"SUV\"").unwrap();
        assert_eq!(category, CarCategory::Suv);
    }

    #[test]
    fn test_filters() {
        let car = sample_car();
        assert!(CarFilters::default().matches(&car));

        let filters = CarFilters {
            min_price: Some(Decimal::from(40)),
            max_price: Some(Decimal::from(60)),
            available: Some(true),
            ..Default::default()
        };
        assert!(filters.matches(&car));

        let filters = CarFilters {
            category: Some(CarCategory::Luxury),
            ..Default::default()
        };
        assert!(!filters.matches(&car));

        let filters = CarFilters {
            max_price: Some(Decimal::from(49)),
            ..Default::default()
        };
        assert!(!filters.matches(&car));
    }

    #[test]
    fn test_changes_keep_untouched_fields() {
        let car = sample_car();
        let updated = CarChanges {
            available: Some(false),
            price_per_day: Some(Decimal::from(65)),
            ..Default::default()
        }
        .apply(&car);

        assert!(!updated.available);
        assert_eq!(updated.price_per_day, Decimal::from(65));
        assert_eq!(updated.brand, car.brand);
        assert_eq!(updated.created_at, car.created_at);
    }
}
