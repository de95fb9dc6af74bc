// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and their projection into [`EGastroAuthentication`].
//!
//! Keycloak access tokens carry standard OIDC claims plus eGastro private
//! claims:
//!
//! ```json
//! {
//!   "iss": "https://localhost:8443/realms/sushibach",
//!   "sub": "5c1b...",
//!   "preferred_username": "thom",
//!   "realm_access": { "roles": ["EGASTRO_CLIENT"] },
//!   "manages": [42],
//!   "worksAt": [42],
//!   "grantsByRestaurantId": { "42": ["VIEW_ORDERS", "UPDATE_ORDERS"] }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;

use super::grants::RestaurantGrant;
use super::principal::EGastroAuthentication;
use super::AuthError;

/// Name of the private claim carrying restaurant grants.
pub const GRANTS_CLAIM: &str = "grantsByRestaurantId";

/// Default claim used as the principal name.
pub const DEFAULT_USERNAME_CLAIM: &str = "preferred_username";

/// Default claims path for Keycloak realm roles.
pub const DEFAULT_AUTHORITIES_CLAIM: &str = "realm_access.roles";

/// How claims map onto the principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimMapping {
    /// Claim holding the username (falls back to `sub` when absent)
    pub username_claim: String,
    /// Dotted paths to string arrays of roles, e.g. `resource_access.api.roles`
    pub authorities_claims: Vec<String>,
    /// Prefix prepended to every extracted role
    pub authorities_prefix: String,
}

impl Default for ClaimMapping {
    fn default() -> Self {
        Self {
            username_claim: DEFAULT_USERNAME_CLAIM.to_string(),
            authorities_claims: vec![DEFAULT_AUTHORITIES_CLAIM.to_string()],
            authorities_prefix: String::new(),
        }
    }
}

/// Standard and private claims read from a validated token.
#[derive(Debug, Clone, Deserialize)]
pub struct EGastroClaims {
    pub iss: String,
    pub sub: String,
    #[serde(default)]
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    /// Authorized party (client ID the token was issued to)
    #[serde(default)]
    pub azp: Option<String>,
    #[serde(default)]
    pub manages: BTreeSet<i64>,
    #[serde(default, rename = "worksAt")]
    pub works_at: BTreeSet<i64>,
    /// Decoded strictly: an unknown label fails the whole claim set.
    #[serde(default, rename = "grantsByRestaurantId")]
    pub grants_by_restaurant_id: BTreeMap<i64, BTreeSet<RestaurantGrant>>,
}

/// Realm name from an issuer URL: its last non-empty path segment.
///
/// `https://localhost:8443/realms/master` → `master`.
pub fn realm_from_issuer(issuer: &str) -> String {
    issuer
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Collect the strings at a dotted path; anything else yields nothing.
pub fn extract_string_array(claims: &Value, path: &str) -> Vec<String> {
    path.split('.')
        .try_fold(claims, |value, segment| value.get(segment))
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

impl ClaimMapping {
    /// Roles from every configured path, prefixed, first occurrence kept.
    pub fn authorities(&self, claims: &Value) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.authorities_claims
            .iter()
            .flat_map(|path| extract_string_array(claims, path))
            .map(|role| format!("{}{role}", self.authorities_prefix))
            .filter(|authority| seen.insert(authority.clone()))
            .collect()
    }

    fn username(&self, claims: &Value, sub: &str) -> String {
        claims
            .get(&self.username_claim)
            .and_then(Value::as_str)
            .unwrap_or(sub)
            .to_string()
    }

    /// Build the principal from a validated claim set.
    ///
    /// Fails closed: a claim with the wrong shape or a grant label outside
    /// [`RestaurantGrant`] rejects the token instead of dropping the grant.
    pub fn project(&self, claims: Value) -> Result<EGastroAuthentication, AuthError> {
        let authorities = self.authorities(&claims);
        let parsed = EGastroClaims::deserialize(&claims)
            .map_err(|e| AuthError::InvalidClaims(e.to_string()))?;
        let username = self.username(&claims, &parsed.sub);

        Ok(EGastroAuthentication {
            realm: realm_from_issuer(&parsed.iss),
            issuer: parsed.iss,
            subject: parsed.sub,
            username,
            email: parsed.email,
            authorized_party: parsed.azp,
            expires_at: parsed.exp,
            authorities,
            manages: parsed.manages,
            works_at: parsed.works_at,
            grants: parsed.grants_by_restaurant_id,
        })
    }
}
