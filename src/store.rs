// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory restaurant and order store.
//!
//! Holds the sample data served by the API. Lookups return owned copies so
//! handlers can release the store lock before evaluating access rules.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{TimeZone, Utc};

use crate::error::ApiError;
use crate::models::{EmployersResponse, Order, Restaurant};

#[derive(Default)]
pub struct InMemoryStore {
    restaurants: BTreeMap<i64, Restaurant>,
    orders: BTreeMap<i64, Order>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with restaurant 42 "Sushi Bach" and two of its orders.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.insert_restaurant(Restaurant {
            id: 42,
            realm: "master".to_string(),
            name: "Sushi Bach".to_string(),
            managers: BTreeSet::new(),
            employees: BTreeSet::from(["thom".to_string()]),
        });

        let passed_at = Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 0).single().unwrap_or_else(Utc::now);
        for (id, customer) in [(1, "ch4mp"), (2, "tonton-pirate")] {
            store.insert_order(Order {
                id,
                restaurant_id: 42,
                customer_name: customer.to_string(),
                passed_at,
            });
        }
        store
    }

    pub fn insert_restaurant(&mut self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id, restaurant);
    }

    pub fn insert_order(&mut self, order: Order) {
        self.orders.insert(order.id, order);
    }

    pub fn restaurant(&self, restaurant_id: i64) -> Result<Restaurant, ApiError> {
        self.restaurants
            .get(&restaurant_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Restaurant not found"))
    }

    /// Order `order_id`, only if it was placed at `restaurant_id`.
    pub fn order(&self, restaurant_id: i64, order_id: i64) -> Result<Order, ApiError> {
        self.orders
            .get(&order_id)
            .filter(|order| order.restaurant_id == restaurant_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Order not found"))
    }

    /// Restaurants of `realm` where `username` is staff.
    pub fn employers(&self, realm: &str, username: &str) -> EmployersResponse {
        let mut employers = EmployersResponse::default();
        for restaurant in self.restaurants.values().filter(|r| r.realm == realm) {
            if restaurant.managers.contains(username) {
                employers.manages.insert(restaurant.id);
            }
            if restaurant.employees.contains(username) {
                employers.works_at.insert(restaurant.id);
            }
        }
        employers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_has_sushi_bach() {
        let store = InMemoryStore::seeded();
        let restaurant = store.restaurant(42).unwrap();
        assert_eq!(restaurant.name, "Sushi Bach");
        assert_eq!(restaurant.realm, "master");
        assert_eq!(store.order(42, 1).unwrap().customer_name, "ch4mp");
        assert_eq!(store.order(42, 2).unwrap().customer_name, "tonton-pirate");
    }

    #[test]
    fn missing_records_are_not_found() {
        let store = InMemoryStore::seeded();
        assert_eq!(store.restaurant(7).unwrap_err().status, axum::http::StatusCode::NOT_FOUND);
        assert!(store.order(42, 99).is_err());
    }

    #[test]
    fn order_from_another_restaurant_is_not_found() {
        let mut store = InMemoryStore::seeded();
        store.insert_restaurant(Restaurant {
            id: 7,
            realm: "burgerhouse".to_string(),
            name: "Burger House".to_string(),
            managers: BTreeSet::new(),
            employees: BTreeSet::new(),
        });
        assert!(store.order(7, 1).is_err());
    }

    #[test]
    fn employers_are_scoped_to_realm() {
        let mut store = InMemoryStore::seeded();
        store.insert_restaurant(Restaurant {
            id: 7,
            realm: "burgerhouse".to_string(),
            name: "Burger House".to_string(),
            managers: BTreeSet::from(["thom".to_string()]),
            employees: BTreeSet::new(),
        });

        let master = store.employers("master", "thom");
        assert_eq!(master.works_at, BTreeSet::from([42]));
        assert!(master.manages.is_empty());

        let burgerhouse = store.employers("burgerhouse", "thom");
        assert_eq!(burgerhouse.manages, BTreeSet::from([7]));
        assert!(burgerhouse.works_at.is_empty());

        assert_eq!(store.employers("master", "nobody"), EmployersResponse::default());
    }
}
