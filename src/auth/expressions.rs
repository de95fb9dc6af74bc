// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization expressions evaluated against the current principal.
//!
//! Handlers combine these predicates the way access rules are written:
//!
//! ```rust,ignore
//! let access = SecurityExpressions::new(&auth);
//! access.require(
//!     access.has_passed(&order)
//!         || access.on(restaurant_id).is_granted_with(RestaurantGrant::ViewOrders),
//! )?;
//! ```
//!
//! Every predicate is recomputed from the principal on each call. Against
//! [`Anonymous`](super::Anonymous) every predicate is `false`.

use super::grants::RestaurantGrant;
use super::principal::Principal;
use super::AuthError;

/// Realm whose users may act on every other realm.
pub const MASTER_REALM: &str = "master";

/// A resource tied to the customer who ordered it.
pub trait PassedOrder {
    fn customer_name(&self) -> &str;
}

/// Expression root bound to one principal.
#[derive(Clone, Copy)]
pub struct SecurityExpressions<'a> {
    principal: &'a dyn Principal,
}

/// Grant checks scoped to one restaurant, see [`SecurityExpressions::on`].
#[derive(Clone, Copy)]
pub struct RestaurantAccess<'a> {
    principal: &'a dyn Principal,
    restaurant_id: i64,
}

impl<'a> SecurityExpressions<'a> {
    pub fn new(principal: &'a dyn Principal) -> Self {
        Self { principal }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_authenticated()
    }

    /// The caller's username equals `username` (case-sensitive).
    pub fn is(&self, username: &str) -> bool {
        self.principal.is_authenticated() && self.principal.username() == username
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.principal.authorities().iter().any(|a| a == authority)
    }

    pub fn has_any_authority(&self, authorities: &[&str]) -> bool {
        authorities.iter().any(|a| self.has_authority(a))
    }

    /// At least one grant on the restaurant.
    pub fn works_for(&self, restaurant_id: i64) -> bool {
        !self.principal.grants_for(restaurant_id).is_empty()
    }

    /// `MANAGE` grant on the restaurant.
    pub fn manages(&self, restaurant_id: i64) -> bool {
        self.on(restaurant_id).is_granted_with(RestaurantGrant::Manage)
    }

    pub fn on(&self, restaurant_id: i64) -> RestaurantAccess<'a> {
        RestaurantAccess {
            principal: self.principal,
            restaurant_id,
        }
    }

    /// The caller is the customer who passed the order.
    pub fn has_passed(&self, order: &impl PassedOrder) -> bool {
        self.is(order.customer_name())
    }

    pub fn is_from(&self, realm: &str) -> bool {
        self.principal.is_authenticated() && self.principal.realm() == realm
    }

    pub fn is_from_master_or(&self, realm: &str) -> bool {
        self.is_from(realm) || self.is_from(MASTER_REALM)
    }

    /// Turn an expression result into a `403`.
    pub fn require(&self, allowed: bool) -> Result<(), AuthError> {
        if allowed {
            Ok(())
        } else {
            tracing::debug!(
                username = %self.principal.username(),
                realm = %self.principal.realm(),
                "Access denied by authorization expression"
            );
            Err(AuthError::Forbidden)
        }
    }
}

impl RestaurantAccess<'_> {
    pub fn is_granted_with(&self, grant: RestaurantGrant) -> bool {
        self.principal.grants_for(self.restaurant_id).contains(&grant)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::auth::principal::tests::make_auth;
    use crate::auth::Anonymous;

    struct TestOrder(&'static str);

    impl PassedOrder for TestOrder {
        fn customer_name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn view_orders_grant_works_for_but_does_not_manage() {
        let mut auth = make_auth("thom");
        auth.grants
            .insert(42, BTreeSet::from([RestaurantGrant::ViewOrders]));
        let access = SecurityExpressions::new(&auth);

        assert!(access.works_for(42));
        assert!(!access.manages(42));
        assert!(access.on(42).is_granted_with(RestaurantGrant::ViewOrders));
        assert!(!access.on(42).is_granted_with(RestaurantGrant::UpdateOrders));
        assert!(!access.works_for(7));
    }

    #[test]
    fn manage_grant_manages() {
        let mut auth = make_auth("thom");
        auth.grants.insert(42, BTreeSet::from([RestaurantGrant::Manage]));
        let access = SecurityExpressions::new(&auth);

        assert!(access.manages(42));
        assert!(access.works_for(42));
        assert!(!access.manages(1));
    }

    #[test]
    fn legacy_claims_do_not_grant() {
        let mut auth = make_auth("thom");
        auth.works_at.insert(42);
        auth.manages.insert(42);
        let access = SecurityExpressions::new(&auth);

        assert!(!access.works_for(42));
        assert!(!access.manages(42));
    }

    #[test]
    fn has_passed_compares_customer_name_exactly() {
        let auth = make_auth("ch4mp");
        let access = SecurityExpressions::new(&auth);

        assert!(access.has_passed(&TestOrder("ch4mp")));
        assert!(!access.has_passed(&TestOrder("Ch4mp")));
        assert!(!access.has_passed(&TestOrder("tonton-pirate")));
    }

    #[test]
    fn is_matches_username() {
        let auth = make_auth("alice");
        assert!(SecurityExpressions::new(&auth).is("alice"));
        assert!(!SecurityExpressions::new(&auth).is("bob"));
        assert!(!SecurityExpressions::new(&Anonymous).is("alice"));
    }

    #[test]
    fn realm_checks() {
        let mut auth = make_auth("thom");
        let access = SecurityExpressions::new(&auth);
        assert!(access.is_from("master"));
        assert!(access.is_from_master_or("sushibach"));

        auth.realm = "sushibach".to_string();
        let access = SecurityExpressions::new(&auth);
        assert!(access.is_from("sushibach"));
        assert!(access.is_from_master_or("sushibach"));
        assert!(!access.is_from_master_or("burgerhouse"));
    }

    #[test]
    fn authority_checks() {
        let mut auth = make_auth("mapper");
        auth.authorities = vec!["KEYCLOAK_MAPPER".to_string()];
        let access = SecurityExpressions::new(&auth);

        assert!(access.has_authority("KEYCLOAK_MAPPER"));
        assert!(!access.has_authority("keycloak_mapper"));
        assert!(access.has_any_authority(&["EGASTRO_CLIENT", "KEYCLOAK_MAPPER"]));
        assert!(!access.has_any_authority(&[]));
    }

    #[test]
    fn anonymous_is_denied_everything() {
        let access = SecurityExpressions::new(&Anonymous);

        assert!(!access.is_authenticated());
        assert!(!access.is(""));
        assert!(!access.works_for(42));
        assert!(!access.manages(42));
        assert!(!access.on(42).is_granted_with(RestaurantGrant::ViewOrders));
        assert!(!access.on(42).is_granted_with(RestaurantGrant::UpdateOrders));
        assert!(!access.on(42).is_granted_with(RestaurantGrant::Manage));
        assert!(!access.has_passed(&TestOrder("")));
        assert!(!access.is_from(""));
        assert!(!access.is_from_master_or(""));
        assert!(!access.has_authority(""));
    }

    #[test]
    fn require_maps_denial_to_forbidden() {
        let access = SecurityExpressions::new(&Anonymous);
        assert!(access.require(true).is_ok());
        assert!(matches!(access.require(false), Err(AuthError::Forbidden)));
    }
}
