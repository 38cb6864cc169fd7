pub mod guard;
pub mod router;
pub mod state;

pub use guard::{Navigation, NavigationGuard};
pub use router::{NavigationError, Router};
pub use state::{RouteEntry, RouteMatch, RouteTable, View, HOME_PATH, LOGIN_PATH, ROUTES};
