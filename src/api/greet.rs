// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Greeting and current-principal endpoints.

use std::fmt::Display;

use axum::Json;

use crate::auth::{Auth, MaybeAuth, Principal};
use crate::models::{GreetingResponse, UserInfoResponse};

/// `[a, b, c]`
fn bracketed<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let items: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    format!("[{}]", items.join(", "))
}

pub fn greeting(principal: &dyn Principal) -> String {
    format!(
        "Hello {}!, you are authenticated in \"{}\" realm, are granted with {}, manage {} and work at {}",
        principal.username(),
        principal.realm(),
        bracketed(principal.authorities()),
        bracketed(principal.manages()),
        bracketed(principal.works_at()),
    )
}

/// Greet the authenticated caller.
pub async fn greet(Auth(auth): Auth) -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: greeting(&auth),
    })
}

/// Describe the caller; empty for anonymous requests.
pub async fn me(MaybeAuth(auth): MaybeAuth) -> Json<UserInfoResponse> {
    let info = match auth {
        Some(auth) => UserInfoResponse {
            realm: auth.realm,
            username: auth.username,
            email: auth.email.unwrap_or_default(),
            roles: auth.authorities,
            manages: auth.manages,
            works_at: auth.works_at,
            grants_by_restaurant_id: auth.grants,
            exp: auth.expires_at,
        },
        None => UserInfoResponse::default(),
    };
    Json(info)
}
