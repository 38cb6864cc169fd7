use std::collections::BTreeMap;
use std::fmt;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

/// Page a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Login,
    Users,
    Profile,
    Projects,
    ProjectDetails,
    Tasks,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Home => "Home",
            View::Login => "Login",
            View::Users => "Users",
            View::Profile => "Profile",
            View::Projects => "Projects",
            View::ProjectDetails => "ProjectDetails",
            View::Tasks => "Tasks",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    /// Path pattern; `:name` segments capture a parameter.
    pub pattern: &'static str,
    pub view: View,
    /// Reachable without a token.
    pub public: bool,
}

pub static ROUTES: &[RouteEntry] = &[
    RouteEntry { pattern: "/", view: View::Home, public: false },
    RouteEntry { pattern: "/login", view: View::Login, public: true },
    RouteEntry { pattern: "/users", view: View::Users, public: false },
    RouteEntry { pattern: "/profile", view: View::Profile, public: false },
    RouteEntry { pattern: "/projects", view: View::Projects, public: false },
    RouteEntry { pattern: "/projects/:id", view: View::ProjectDetails, public: false },
    RouteEntry { pattern: "/tasks", view: View::Tasks, public: false },
];

/// A path resolved against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub path: String,
    pub view: View,
    pub public: bool,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    entries: &'static [RouteEntry],
}

impl RouteTable {
    pub fn new(entries: &'static [RouteEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [RouteEntry] {
        self.entries
    }

    /// First entry whose pattern matches `path`, ignoring any query string,
    /// fragment and trailing slash.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize(path);
        let segments = split(&path);

        self.entries.iter().find_map(|entry| {
            let params = match_pattern(entry.pattern, &segments)?;
            Some(RouteMatch {
                path: path.clone(),
                view: entry.view,
                public: entry.public,
                params,
            })
        })
    }

    /// Unknown paths count as protected.
    pub fn is_public(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|route| route.public)
    }

    pub fn is_login(&self, path: &str) -> bool {
        self.resolve(path)
            .is_some_and(|route| route.view == View::Login)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(ROUTES)
    }
}

pub(crate) fn normalize(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let pattern_segments = split(pattern);
    if pattern_segments.len() != segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (expected, actual) in pattern_segments.iter().zip(segments) {
        match expected.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), actual.to_string());
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}
