// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module provides Keycloak bearer-token authentication and
//! restaurant-scoped authorization for the eGastro API.
//!
//! ## Auth Flow
//!
//! 1. Clients authenticate with Keycloak in one of several realms
//! 2. Clients send `Authorization: Bearer <access token>`
//! 3. The server:
//!    - Reads `iss` and accepts only issuers under the trusted Keycloak host
//!    - Discovers each realm's JWKS once, via OIDC discovery
//!    - Verifies JWT signature, expiry, issuer, audience
//!    - Projects the claims into an [`EGastroAuthentication`]:
//!      - realm from the issuer URL
//!      - authorities from configured role claims
//!      - per-restaurant grants from `grantsByRestaurantId`
//! 4. Handlers guard access with [`SecurityExpressions`]
//!
//! ## Security
//!
//! - Unknown issuers are rejected before any network call
//! - Unknown grant labels reject the whole token
//! - JWKS is cached with TTL, refreshed once on an unknown `kid`
//! - Clock skew tolerance is 60 seconds
//! - Anonymous callers fail every authorization expression

pub mod claims;
pub mod discovery;
pub mod error;
pub mod expressions;
pub mod extractor;
pub mod grants;
pub mod jwks;
pub mod middleware;
pub mod principal;
pub mod resolver;

pub use claims::ClaimMapping;
pub use discovery::{HttpOidcDiscovery, OidcDiscovery};
pub use error::AuthError;
pub use expressions::{PassedOrder, SecurityExpressions};
pub use extractor::{Auth, MaybeAuth};
pub use grants::RestaurantGrant;
pub use jwks::JwksManager;
pub use middleware::require_bearer;
pub use principal::{Anonymous, EGastroAuthentication, Principal};
pub use resolver::{IssuerResolver, ValidationSettings};
