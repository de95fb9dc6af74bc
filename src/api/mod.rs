// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::header::HeaderName,
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{auth::require_bearer, state::AppState};

pub mod greet;
pub mod health;
pub mod orders;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/greet", get(greet::greet))
        .route("/users/{realm}/{username}/employers", get(users::employers))
        .route(
            "/restaurants/{restaurant_id}/orders/{order_id}",
            get(orders::retrieve_order),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/me", get(greet::me))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .merge(protected_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id_header.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id_header)),
        )
        .layer(CorsLayer::permissive())
}
