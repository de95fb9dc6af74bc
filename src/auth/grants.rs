// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Restaurant-scoped grants.

use serde::{Deserialize, Serialize};

/// Permission a user holds on one restaurant.
///
/// The set is closed: the token issuer and this server share the same labels,
/// and a label outside this enumeration is a decoding error, never ignored.
///
/// ## Labels
///
/// - `VIEW_ORDERS` - Read the restaurant's orders
/// - `UPDATE_ORDERS` - Create, modify and delete orders on behalf of customers
/// - `MANAGE` - Manage the restaurant (dishes, staff)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestaurantGrant {
    ViewOrders,
    UpdateOrders,
    Manage,
}
