// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into an [`AppConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `KEYCLOAK_HOST` | Trusted Keycloak base URL; token issuers must live under it | Required |
//! | `AUTHORITIES_CLAIMS` | Comma-separated claim paths holding roles | `realm_access.roles` |
//! | `AUTHORITIES_PREFIX` | Prefix prepended to every role | empty |
//! | `USERNAME_CLAIM` | Claim used as the username | `preferred_username` |
//! | `TOKEN_AUDIENCE` | Expected JWT audience claim | Optional |
//! | `JWKS_CACHE_TTL_SECS` | Signing key cache TTL per issuer | `300` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM certificate chain and key; HTTPS when both set | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::auth::claims::{ClaimMapping, DEFAULT_AUTHORITIES_CLAIM, DEFAULT_USERNAME_CLAIM};
use crate::auth::resolver::{ValidationSettings, CLOCK_SKEW_LEEWAY};

pub const KEYCLOAK_HOST_ENV: &str = "KEYCLOAK_HOST";
pub const AUTHORITIES_CLAIMS_ENV: &str = "AUTHORITIES_CLAIMS";
pub const AUTHORITIES_PREFIX_ENV: &str = "AUTHORITIES_PREFIX";
pub const USERNAME_CLAIM_ENV: &str = "USERNAME_CLAIM";
pub const TOKEN_AUDIENCE_ENV: &str = "TOKEN_AUDIENCE";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// PEM files for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Trusted Keycloak base URL, without trailing slash
    pub keycloak_host: String,
    pub claim_mapping: ClaimMapping,
    pub audience: Option<String>,
    pub jwks_cache_ttl: Duration,
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let keycloak_host = parse_keycloak_host(
            &get(KEYCLOAK_HOST_ENV).ok_or(ConfigError::Missing(KEYCLOAK_HOST_ENV))?,
        )?;

        let authorities_claims = match get(AUTHORITIES_CLAIMS_ENV) {
            Some(paths) => paths
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
            None => vec![DEFAULT_AUTHORITIES_CLAIM.to_string()],
        };
        let claim_mapping = ClaimMapping {
            username_claim: get(USERNAME_CLAIM_ENV).unwrap_or_else(|| DEFAULT_USERNAME_CLAIM.to_string()),
            authorities_claims,
            authorities_prefix: get(AUTHORITIES_PREFIX_ENV).unwrap_or_default(),
        };

        let jwks_cache_ttl = match get(JWKS_CACHE_TTL_ENV) {
            Some(secs) => Duration::from_secs(secs.parse().map_err(|_| ConfigError::Invalid {
                var: JWKS_CACHE_TTL_ENV,
                reason: format!("expected seconds, got {secs:?}"),
            })?),
            None => Duration::from_secs(DEFAULT_JWKS_CACHE_TTL_SECS),
        };

        let port = match get(PORT_ENV) {
            Some(port) => port.parse().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                reason: format!("expected a port number, got {port:?}"),
            })?,
            None => DEFAULT_PORT,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|f| f.to_ascii_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT_ENV,
                    reason: format!("expected json or pretty, got {other:?}"),
                })
            }
        };

        Ok(Self {
            keycloak_host,
            claim_mapping,
            audience: get(TOKEN_AUDIENCE_ENV),
            jwks_cache_ttl,
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            tls,
            log_format,
        })
    }

    pub fn validation_settings(&self) -> ValidationSettings {
        ValidationSettings {
            audience: self.audience.clone(),
            leeway: CLOCK_SKEW_LEEWAY,
            jwks_cache_ttl: self.jwks_cache_ttl,
            claim_mapping: self.claim_mapping.clone(),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                var: HOST_ENV,
                reason: format!("cannot bind to {}:{}", self.host, self.port),
            })
    }
}

/// Absolute http(s) URL with a host; returned without trailing slash.
fn parse_keycloak_host(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: KEYCLOAK_HOST_ENV,
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    Ok(raw.trim_end_matches('/').to_string())
}
