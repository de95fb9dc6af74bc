// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! eGastro Resource Server - Keycloak-secured restaurant ordering API
//!
//! This crate validates bearer tokens from any Keycloak realm under a trusted
//! host and authorizes requests with restaurant-scoped grants carried in
//! private token claims.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Multi-issuer authentication and authorization expressions
//! - `config` - Environment configuration
//! - `store` - In-memory restaurants and orders

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
