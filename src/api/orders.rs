// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::{Auth, RestaurantGrant, SecurityExpressions};
use crate::error::ApiError;
use crate::models::Order;
use crate::state::AppState;

/// Get one order of a restaurant.
///
/// Readable by the customer who passed it and by anyone granted
/// `VIEW_ORDERS` on the restaurant.
pub async fn retrieve_order(
    Auth(auth): Auth,
    State(state): State<AppState>,
    Path((restaurant_id, order_id)): Path<(i64, i64)>,
) -> Result<Json<Order>, ApiError> {
    let order = {
        let store = state.store.read().await;
        store.restaurant(restaurant_id)?;
        store.order(restaurant_id, order_id)?
    };

    let access = SecurityExpressions::new(&auth);
    access.require(
        access.has_passed(&order)
            || access
                .on(restaurant_id)
                .is_granted_with(RestaurantGrant::ViewOrders),
    )?;

    Ok(Json(order))
}
