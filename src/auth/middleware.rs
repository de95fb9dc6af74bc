// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to a router subtree, it rejects requests without a valid bearer
//! token before any handler runs and stores the principal in the request
//! extensions, where the [`Auth`](super::Auth) extractor picks it up.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/greet", get(greet))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_bearer));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::bearer_token;
use crate::state::AppState;

/// Authenticate the bearer token or answer `401`.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    match state.auth.authenticate(token).await {
        Ok(auth) => {
            tracing::debug!(username = %auth.username, realm = %auth.realm, "Authenticated request");
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
