// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) caching for one issuer.
//!
//! ## Behavior
//!
//! - Keys are cached with a configurable TTL
//! - A `kid` missing from a fresh cache triggers one forced refresh, so key
//!   rotation on the identity provider is picked up without waiting for TTL
//! - Forced refreshes are at most one per [`MIN_FORCED_REFRESH_INTERVAL`];
//!   unknown `kid`s inside that window are rejected from cache
//! - Only asymmetric (RSA, EC) keys are used; `oct` keys are refused
//! - Stale cache is served when a refresh fails

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::{Mutex, RwLock};

use super::discovery::OidcDiscovery;
use super::error::AuthError;

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Minimum time between two refreshes forced by an unknown `kid`.
pub const MIN_FORCED_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// JWKS manager with caching.
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS URL advertised by the issuer's discovery document
    jwks_uri: String,
    /// Cache TTL
    cache_ttl: Duration,
    /// Cached JWKS
    cache: Arc<RwLock<Option<CacheEntry>>>,
    min_forced_refresh_interval: Duration,
    /// Last refresh forced by an unknown kid
    last_forced_refresh: Arc<Mutex<Option<Instant>>>,
    /// Key source
    discovery: Arc<dyn OidcDiscovery>,
}

impl JwksManager {
    pub fn new(jwks_uri: impl Into<String>, discovery: Arc<dyn OidcDiscovery>) -> Self {
        Self {
            jwks_uri: jwks_uri.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
            min_forced_refresh_interval: MIN_FORCED_REFRESH_INTERVAL,
            last_forced_refresh: Arc::new(Mutex::new(None)),
            discovery,
        }
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Create with a custom minimum interval between forced refreshes.
    pub fn with_min_forced_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_forced_refresh_interval = interval;
        self
    }

    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }

    /// Fetch JWKS (with caching).
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        match self.refresh().await {
            Ok(jwks) => Ok(jwks),
            Err(e) => {
                let cache = self.cache.read().await;
                match &*cache {
                    Some(entry) => {
                        tracing::warn!(
                            jwks_uri = %self.jwks_uri,
                            error = %e,
                            "JWKS refresh failed, serving stale keys"
                        );
                        Ok(entry.jwks.clone())
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Force refresh the JWKS cache.
    pub async fn refresh(&self) -> Result<JwkSet, AuthError> {
        let jwks = self
            .discovery
            .fetch_jwks(&self.jwks_uri)
            .await
            .map_err(|e| AuthError::Discovery(e.to_string()))?;

        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            jwks: jwks.clone(),
            fetched_at: Instant::now(),
        });
        Ok(jwks)
    }

    /// Get a decoding key for the given key ID.
    pub async fn get_decoding_key(&self, kid: &str) -> Result<(DecodingKey, Algorithm), AuthError> {
        let jwks = self.get_jwks().await?;
        if let Some(jwk) = find_key(&jwks, kid) {
            return jwk_to_decoding_key(jwk);
        }

        // Unknown kid: the provider may have rotated its keys.
        {
            let mut last = self.last_forced_refresh.lock().await;
            if let Some(at) = *last {
                if at.elapsed() < self.min_forced_refresh_interval {
                    tracing::debug!(jwks_uri = %self.jwks_uri, %kid, "Unknown key ID, JWKS refreshed recently");
                    return Err(AuthError::NoMatchingKey);
                }
            }
            *last = Some(Instant::now());
        }
        tracing::debug!(jwks_uri = %self.jwks_uri, %kid, "Unknown key ID, refreshing JWKS");
        let jwks = self.refresh().await?;
        let jwk = find_key(&jwks, kid).ok_or(AuthError::NoMatchingKey)?;
        jwk_to_decoding_key(jwk)
    }

    /// Get any usable decoding key (for tokens without kid).
    pub async fn get_any_decoding_key(&self) -> Result<(DecodingKey, Algorithm), AuthError> {
        let jwks = self.get_jwks().await?;
        jwks.keys
            .iter()
            .find_map(|jwk| jwk_to_decoding_key(jwk).ok())
            .ok_or(AuthError::NoMatchingKey)
    }
}

fn find_key<'a>(jwks: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    jwks.keys
        .iter()
        .find(|k| k.common.key_id.as_deref() == Some(kid))
}

/// Convert a JWK to a DecodingKey.
///
/// The algorithm always comes from the key, never from the token header.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<(DecodingKey, Algorithm), AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => {
            let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|e| AuthError::Discovery(format!("Failed to create RSA key: {e}")))?;

            let alg = match jwk.common.key_algorithm {
                Some(KeyAlgorithm::RS384) => Algorithm::RS384,
                Some(KeyAlgorithm::RS512) => Algorithm::RS512,
                Some(KeyAlgorithm::PS256) => Algorithm::PS256,
                Some(KeyAlgorithm::PS384) => Algorithm::PS384,
                Some(KeyAlgorithm::PS512) => Algorithm::PS512,
                _ => Algorithm::RS256,
            };

            Ok((key, alg))
        }
        AlgorithmParameters::EllipticCurve(ec) => {
            let key = DecodingKey::from_ec_components(&ec.x, &ec.y)
                .map_err(|e| AuthError::Discovery(format!("Failed to create EC key: {e}")))?;

            let alg = match jwk.common.key_algorithm {
                Some(KeyAlgorithm::ES384) => Algorithm::ES384,
                _ => Algorithm::ES256,
            };

            Ok((key, alg))
        }
        _ => Err(AuthError::Discovery(
            "Unsupported key type in JWKS".to_string(),
        )),
    }
}
