// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Realm advertised in `WWW-Authenticate` challenges.
const CHALLENGE_REALM: &str = "eGastro";

/// Authentication error type.
///
/// Every variant except [`AuthError::Forbidden`] is an authentication failure
/// and maps to `401 Unauthorized` with a bearer challenge. None of them is
/// retried: a failed discovery simply fails the current request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Invalid authorization header format
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Token is malformed
    #[error("Token is malformed")]
    MalformedToken,
    /// Issuer is not under the trusted host
    #[error("Unknown issuer: {0}")]
    UnknownIssuer(String),
    /// OIDC discovery or JWKS retrieval failed
    #[error("Failed to resolve issuer configuration: {0}")]
    Discovery(String),
    /// No matching key in JWKS
    #[error("No matching key found in JWKS")]
    NoMatchingKey,
    /// Token signature is invalid
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,
    /// Token is not yet valid
    #[error("Token is not yet valid")]
    TokenNotYetValid,
    /// Token issuer does not match the validator
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    /// Token audience is invalid
    #[error("Token audience is invalid")]
    InvalidAudience,
    /// Claims could not be projected into a principal
    #[error("Invalid token claims: {0}")]
    InvalidClaims(String),
    /// Authenticated, but an authorization expression denied access
    #[error("Insufficient permissions for this operation")]
    Forbidden,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnknownIssuer(_) => "unknown_issuer",
            AuthError::Discovery(_) => "issuer_unavailable",
            AuthError::NoMatchingKey => "no_matching_key",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::Forbidden => "forbidden",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Bearer challenge (RFC 6750) for 401 responses.
    fn challenge(&self) -> Option<String> {
        match self {
            AuthError::Forbidden => None,
            AuthError::MissingAuthHeader => Some(format!("Bearer realm=\"{CHALLENGE_REALM}\"")),
            AuthError::InvalidAuthHeader => Some(format!(
                "Bearer realm=\"{CHALLENGE_REALM}\", error=\"invalid_request\""
            )),
            _ => Some(format!(
                "Bearer realm=\"{CHALLENGE_REALM}\", error=\"invalid_token\""
            )),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
            _ => AuthError::MalformedToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let challenge = self.challenge();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });

        let mut response = (status, body).into_response();
        if let Some(value) = challenge.and_then(|c| HeaderValue::from_str(&c).ok()) {
            response.headers_mut().insert(WWW_AUTHENTICATE, value);
        }
        response
    }
}
