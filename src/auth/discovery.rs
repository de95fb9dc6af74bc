// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! OIDC discovery and JWKS retrieval.
//!
//! The resolver only talks to identity providers through [`OidcDiscovery`],
//! which keeps network access out of the validation logic and lets tests
//! count round-trips.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use serde::Deserialize;

/// Path appended to an issuer to locate its provider configuration.
pub const WELL_KNOWN_PATH: &str = "/.well-known/openid-configuration";

/// HTTP timeout for discovery and JWKS requests.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// The subset of OpenID Provider Metadata used to validate tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderMetadata {
    /// Issuer identifier; must equal the `iss` claim of issued tokens.
    pub issuer: String,
    /// Location of the provider's signing keys.
    pub jwks_uri: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("Failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Source of provider metadata and signing keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OidcDiscovery: Send + Sync {
    /// Fetch the provider configuration published under `issuer`.
    async fn discover(&self, issuer: &str) -> Result<ProviderMetadata, DiscoveryError>;

    /// Fetch the key set published at `jwks_uri`.
    async fn fetch_jwks(&self, jwks_uri: &str) -> Result<JwkSet, DiscoveryError>;
}

/// Build the discovery document URL for an issuer.
pub fn configuration_url(issuer: &str) -> String {
    format!("{}{WELL_KNOWN_PATH}", issuer.trim_end_matches('/'))
}

/// [`OidcDiscovery`] over HTTPS with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpOidcDiscovery {
    client: reqwest::Client,
}

impl HttpOidcDiscovery {
    pub fn new() -> Result<Self, DiscoveryError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(DiscoveryError::Client)?;
        Ok(Self { client })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, DiscoveryError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DiscoveryError::Fetch {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(|source| DiscoveryError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl OidcDiscovery for HttpOidcDiscovery {
    async fn discover(&self, issuer: &str) -> Result<ProviderMetadata, DiscoveryError> {
        let url = configuration_url(issuer);
        tracing::debug!(%issuer, %url, "Fetching OIDC provider configuration");

        self.get_json(&url).await
    }

    async fn fetch_jwks(&self, jwks_uri: &str) -> Result<JwkSet, DiscoveryError> {
        tracing::debug!(%jwks_uri, "Fetching JWK set");
        self.get_json(jwks_uri).await
    }
}
