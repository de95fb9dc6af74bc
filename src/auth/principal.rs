// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request principals.
//!
//! [`EGastroAuthentication`] is built once per request from a validated token
//! and never mutated. [`Anonymous`] stands in when no token was presented, so
//! authorization code can query any principal without type checks.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::grants::RestaurantGrant;

static NO_GRANTS: BTreeSet<RestaurantGrant> = BTreeSet::new();
static NO_RESTAURANTS: BTreeSet<i64> = BTreeSet::new();

/// What authorization expressions can ask of the current caller.
///
/// Defaults describe a caller with no identity at all.
pub trait Principal: Send + Sync {
    fn is_authenticated(&self) -> bool {
        false
    }

    fn username(&self) -> &str {
        ""
    }

    /// Keycloak realm the token was issued by.
    fn realm(&self) -> &str {
        ""
    }

    fn authorities(&self) -> &[String] {
        &[]
    }

    fn grants_for(&self, _restaurant_id: i64) -> &BTreeSet<RestaurantGrant> {
        &NO_GRANTS
    }

    /// Restaurants listed in the `manages` claim.
    fn manages(&self) -> &BTreeSet<i64> {
        &NO_RESTAURANTS
    }

    /// Restaurants listed in the `worksAt` claim.
    fn works_at(&self) -> &BTreeSet<i64> {
        &NO_RESTAURANTS
    }
}

/// Principal of an unauthenticated request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Anonymous;

impl Principal for Anonymous {}

/// Principal derived from a validated Keycloak access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EGastroAuthentication {
    /// Issuer URL (`iss`)
    pub issuer: String,
    /// Realm name, last segment of the issuer URL
    pub realm: String,
    /// Subject (`sub`)
    pub subject: String,
    /// Value of the configured username claim
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// OAuth2 client the token was issued to (`azp`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_party: Option<String>,
    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
    pub authorities: Vec<String>,
    pub manages: BTreeSet<i64>,
    pub works_at: BTreeSet<i64>,
    #[serde(rename = "grantsByRestaurantId")]
    pub grants: BTreeMap<i64, BTreeSet<RestaurantGrant>>,
}

impl EGastroAuthentication {
    pub fn grants_by_restaurant_id(&self) -> &BTreeMap<i64, BTreeSet<RestaurantGrant>> {
        &self.grants
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

impl Principal for EGastroAuthentication {
    fn is_authenticated(&self) -> bool {
        true
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn realm(&self) -> &str {
        &self.realm
    }

    fn authorities(&self) -> &[String] {
        &self.authorities
    }

    fn grants_for(&self, restaurant_id: i64) -> &BTreeSet<RestaurantGrant> {
        self.grants.get(&restaurant_id).unwrap_or(&NO_GRANTS)
    }

    fn manages(&self) -> &BTreeSet<i64> {
        &self.manages
    }

    fn works_at(&self) -> &BTreeSet<i64> {
        &self.works_at
    }
}
