use tracing::debug;

use super::state::{HOME_PATH, LOGIN_PATH, RouteTable};
use crate::auth::CredentialStore;

/// Result of checking one route transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allowed,
    Redirected(String),
}

/// Presence check run before every route transition.
///
/// Does not validate the token; an expired token still lets the user in
/// until a request comes back unauthorized.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    credentials: CredentialStore,
    routes: RouteTable,
}

impl NavigationGuard {
    pub fn new(credentials: CredentialStore, routes: RouteTable) -> Self {
        Self { credentials, routes }
    }

    pub fn check(&self, from: &str, to: &str) -> Navigation {
        let authenticated = self.credentials.is_authenticated();

        let outcome = if !self.routes.is_public(to) && !authenticated {
            Navigation::Redirected(LOGIN_PATH.to_string())
        } else if self.routes.is_login(to) && authenticated {
            Navigation::Redirected(HOME_PATH.to_string())
        } else {
            Navigation::Allowed
        };

        debug!("Route {} -> {}: {:?}", from, to, outcome);
        outcome
    }
}
