use thiserror::Error;
use tracing::info;

use super::guard::{Navigation, NavigationGuard};
use super::state::{normalize, RouteMatch, RouteTable};
use crate::auth::CredentialStore;

// Redirects followed per navigation before giving up.
const MAX_REDIRECTS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches {0}")]
    NotFound(String),

    #[error("Too many redirects while navigating to {0}")]
    RedirectLoop(String),
}

/// Tracks the current route and runs every transition through the guard.
#[derive(Debug)]
pub struct Router {
    routes: RouteTable,
    guard: NavigationGuard,
    current: Option<RouteMatch>,
}

impl Router {
    pub fn new(credentials: CredentialStore, routes: RouteTable) -> Self {
        Self {
            routes,
            guard: NavigationGuard::new(credentials, routes),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&RouteMatch> {
        self.current.as_ref()
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    /// Move to `path`, following guard redirects.
    ///
    /// The current route is only updated when a route is actually entered.
    pub fn navigate(&mut self, path: &str) -> Result<RouteMatch, NavigationError> {
        let from = self
            .current
            .as_ref()
            .map(|route| route.path.clone())
            .unwrap_or_else(|| "/".to_string());
        let mut target = normalize(path);

        for _ in 0..=MAX_REDIRECTS {
            match self.guard.check(&from, &target) {
                Navigation::Allowed => {
                    let route = self
                        .routes
                        .resolve(&target)
                        .ok_or_else(|| NavigationError::NotFound(target.clone()))?;
                    info!("Entered {} ({})", route.path, route.view);
                    self.current = Some(route.clone());
                    return Ok(route);
                }
                Navigation::Redirected(next) => {
                    info!("Redirecting {} to {}", target, next);
                    target = next;
                }
            }
        }

        Err(NavigationError::RedirectLoop(normalize(path)))
    }
}
