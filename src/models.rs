// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Domain records held by the in-memory store and the response bodies of
//! the REST API.
//!
//! ## Model Categories
//!
//! - **Restaurants**: staff lists read by the employer lookup
//! - **Orders**: placed by a customer at one restaurant
//! - **Responses**: greeting, current principal, employer lookup

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{PassedOrder, RestaurantGrant};

// =============================================================================
// Domain
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    /// Keycloak realm the restaurant's staff log into
    pub realm: String,
    pub name: String,
    pub managers: BTreeSet<String>,
    pub employees: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub restaurant_id: i64,
    pub customer_name: String,
    pub passed_at: DateTime<Utc>,
}

impl PassedOrder for Order {
    fn customer_name(&self) -> &str {
        &self.customer_name
    }
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GreetingResponse {
    pub message: String,
}

/// Response for GET /me.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub realm: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub manages: BTreeSet<i64>,
    pub works_at: BTreeSet<i64>,
    pub grants_by_restaurant_id: BTreeMap<i64, BTreeSet<RestaurantGrant>>,
    /// Token expiration (Unix timestamp), `0` when anonymous
    pub exp: i64,
}

/// Restaurants a user is staff of, as injected into tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmployersResponse {
    pub manages: BTreeSet<i64>,
    pub works_at: BTreeSet<i64>,
}
