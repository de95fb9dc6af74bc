// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::IssuerResolver;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    /// Issuer-to-validator cache, shared by all requests
    pub auth: Arc<IssuerResolver>,
}

impl AppState {
    pub fn new(store: InMemoryStore, auth: IssuerResolver) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            auth: Arc::new(auth),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::resolver::tests::{mock_discovery, TRUSTED_HOST};
    use crate::auth::ValidationSettings;

    /// Seeded store and a resolver trusting `https://localhost:8443`.
    pub(crate) fn test_state() -> AppState {
        let resolver = IssuerResolver::new(
            TRUSTED_HOST,
            Arc::new(mock_discovery()),
            ValidationSettings::default(),
        );
        AppState::new(InMemoryStore::seeded(), resolver)
    }
}
