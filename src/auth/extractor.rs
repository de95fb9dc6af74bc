// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the request principal.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(auth): Auth) -> impl IntoResponse {
//!     // auth is EGastroAuthentication
//! }
//! ```
//!
//! `MaybeAuth` accepts anonymous requests and exposes the caller as a
//! [`Principal`] either way.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, Anonymous, EGastroAuthentication, Principal};
use crate::state::AppState;

/// Bearer token from the `Authorization` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Extractor for authenticated callers.
///
/// Reuses the principal set by [`require_bearer`](super::require_bearer)
/// when present, otherwise authenticates the bearer token itself.
pub struct Auth(pub EGastroAuthentication);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<EGastroAuthentication>().cloned() {
            return Ok(Auth(auth));
        }

        let token = bearer_token(&parts.headers)?;
        let auth = state.auth.authenticate(token).await?;
        parts.extensions.insert(auth.clone());

        Ok(Auth(auth))
    }
}

/// Optional authentication extractor.
///
/// `None` only when no `Authorization` header was sent; a header carrying
/// a bad token is still rejected.
pub struct MaybeAuth(pub Option<EGastroAuthentication>);

impl MaybeAuth {
    /// The caller, [`Anonymous`] when unauthenticated.
    pub fn principal(&self) -> &dyn Principal {
        match &self.0 {
            Some(auth) => auth,
            None => &Anonymous,
        }
    }
}

impl FromRequestParts<AppState> for MaybeAuth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(auth)) => Ok(MaybeAuth(Some(auth))),
            Err(AuthError::MissingAuthHeader) => Ok(MaybeAuth(None)),
            Err(e) => Err(e),
        }
    }
}
