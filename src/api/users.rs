// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::{Auth, SecurityExpressions};
use crate::error::ApiError;
use crate::models::EmployersResponse;
use crate::state::AppState;

/// Authority of the Keycloak protocol mapper client.
pub const KEYCLOAK_MAPPER: &str = "KEYCLOAK_MAPPER";

/// Restaurants a user manages or works at.
///
/// Called by the Keycloak mapper to build the `manages` and `worksAt`
/// private claims of that user's next token.
pub async fn employers(
    Auth(auth): Auth,
    State(state): State<AppState>,
    Path((realm, username)): Path<(String, String)>,
) -> Result<Json<EmployersResponse>, ApiError> {
    let access = SecurityExpressions::new(&auth);
    access.require(access.has_authority(KEYCLOAK_MAPPER))?;

    let store = state.store.read().await;
    Ok(Json(store.employers(&realm, &username)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::principal::tests::make_auth;
    use crate::state::tests::test_state;
    use axum::http::StatusCode;
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn mapper_reads_employers() {
        let mut auth = make_auth("service-account-egastro-mapper");
        auth.authorities = vec![KEYCLOAK_MAPPER.to_string()];

        let Json(body) = employers(
            Auth(auth),
            State(test_state()),
            Path(("master".to_string(), "thom".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(body.works_at, BTreeSet::from([42]));
        assert!(body.manages.is_empty());
    }

    #[tokio::test]
    async fn other_callers_are_forbidden() {
        let result = employers(
            Auth(make_auth("thom")),
            State(test_state()),
            Path(("master".to_string(), "thom".to_string())),
        )
        .await;
        assert_eq!(result.unwrap_err().status, StatusCode::FORBIDDEN);
    }
}
