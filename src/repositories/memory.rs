//! Repositorios en memoria
//!
//! Se usan cuando el servicio arranca sin `DATABASE_URL` y en los tests.
//! Cada escritura toma el lock de escritura completo, así que un cambio de
//! estado es atómico igual que un UPDATE de una sola fila.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookingRepository, CarRepository, UserRepository};
use crate::models::{
    auth::UserRole,
    booking::{Booking, BookingStatus},
    car::{Car, CarChanges, CarFilters, NewCar},
    user::{NewUser, User},
};
use crate::utils::errors::{conflict_error, AppResult};

/// Ordenar más recientes primero; a igual `created_at` gana el último insertado
fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<T> = items.iter().rev().cloned().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    sorted
}

#[derive(Default)]
pub struct InMemoryCarRepository {
    cars: RwLock<Vec<Car>>,
}

impl InMemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    async fn create(&self, car: NewCar) -> AppResult<Car> {
        let car = Car {
            id: Uuid::new_v4(),
            brand: car.brand,
            model: car.model,
            year: car.year,
            category: car.category,
            price_per_day: car.price_per_day,
            seats: car.seats,
            transmission: car.transmission,
            fuel_type: car.fuel_type,
            image: car.image,
            available: car.available,
            features: car.features,
            created_at: Utc::now(),
        };
        self.cars.write().await.push(car.clone());
        Ok(car)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        Ok(self.cars.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Car>> {
        let cars = self.cars.read().await;
        Ok(cars.iter().filter(|c| ids.contains(&c.id)).cloned().collect())
    }

    async fn list(&self, filters: &CarFilters) -> AppResult<Vec<Car>> {
        let cars = self.cars.read().await;
        let matching: Vec<Car> = cars.iter().filter(|c| filters.matches(c)).cloned().collect();
        Ok(newest_first(&matching, |c| c.created_at))
    }

    async fn update(&self, id: Uuid, changes: CarChanges) -> AppResult<Option<Car>> {
        let mut cars = self.cars.write().await;
        Ok(cars.iter_mut().find(|c| c.id == id).map(|car| {
            *car = changes.apply(car);
            car.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut cars = self.cars.write().await;
        let before = cars.len();
        cars.retain(|c| c.id != id);
        Ok(cars.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: Booking) -> AppResult<Booking> {
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn find_by_id_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let owned: Vec<Booking> = bookings.iter().filter(|b| b.user_id == user_id).cloned().collect();
        Ok(newest_first(&owned, |b| b.created_at))
    }

    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(newest_first(bookings.as_slice(), |b| b.created_at))
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Option<Booking>> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings.iter_mut().find(|b| b.id == id).map(|booking| {
            booking.status = status;
            booking.clone()
        }))
    }

    async fn transition_status(
        &self,
        id: Uuid,
        user_id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings
            .iter_mut()
            .find(|b| b.id == id && b.user_id == user_id && b.status == expected)
            .map(|booking| {
                booking.status = next;
                booking.clone()
            }))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(conflict_error("User", "email", &user.email));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        let users: Vec<User> = self.users.read().await.values().cloned().collect();
        Ok(newest_first(&users, |u| u.created_at))
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            if let Some(name) = name {
                user.name = name;
            }
            if let Some(phone) = phone {
                user.phone = phone;
            }
            user.clone()
        }))
    }
}
