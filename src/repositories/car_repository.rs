use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::CarRepository;
use crate::models::car::{Car, CarChanges, CarFilters, NewCar};
use crate::utils::errors::AppResult;

pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn create(&self, car: NewCar) -> AppResult<Car> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (id, brand, model, year, category, price_per_day, seats,
                              transmission, fuel_type, image, available, features, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(car.brand)
        .bind(car.model)
        .bind(car.year)
        .bind(car.category)
        .bind(car.price_per_day)
        .bind(car.seats)
        .bind(car.transmission)
        .bind(car.fuel_type)
        .bind(car.image)
        .bind(car.available)
        .bind(car.features)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(cars)
    }

    async fn list(&self, filters: &CarFilters) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE ($1::car_category IS NULL OR category = $1)
              AND ($2::numeric IS NULL OR price_per_day >= $2)
              AND ($3::numeric IS NULL OR price_per_day <= $3)
              AND ($4::boolean IS NULL OR available = $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filters.category)
        .bind(filters.min_price)
        .bind(filters.max_price)
        .bind(filters.available)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    async fn update(&self, id: Uuid, changes: CarChanges) -> AppResult<Option<Car>> {
        // Un solo UPDATE: los campos ausentes conservan el valor de la fila
        let updated = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET brand = COALESCE($2, brand),
                model = COALESCE($3, model),
                year = COALESCE($4, year),
                category = COALESCE($5, category),
                price_per_day = COALESCE($6, price_per_day),
                seats = COALESCE($7, seats),
                transmission = COALESCE($8, transmission),
                fuel_type = COALESCE($9, fuel_type),
                image = COALESCE($10, image),
                available = COALESCE($11, available),
                features = COALESCE($12, features)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.brand)
        .bind(changes.model)
        .bind(changes.year)
        .bind(changes.category)
        .bind(changes.price_per_day)
        .bind(changes.seats)
        .bind(changes.transmission)
        .bind(changes.fuel_type)
        .bind(changes.image)
        .bind(changes.available)
        .bind(changes.features)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
