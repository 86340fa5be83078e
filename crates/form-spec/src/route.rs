use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static FILL_ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/forms/(?P<id>[^/]+)$").expect("fill route pattern is valid")
});

/// Views reachable by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Build,
    Fill { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no view is mounted at '{0}'")]
    NotFound(String),
}

impl Route {
    /// Query strings, fragments and one trailing slash are ignored.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let path = raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };

        if path == "/build" {
            return Ok(Route::Build);
        }
        if let Some(captures) = FILL_ROUTE.captures(path) {
            return Ok(Route::Fill {
                id: captures["id"].to_string(),
            });
        }
        Err(RouteError::NotFound(raw.to_string()))
    }

    pub fn path(&self) -> String {
        match self {
            Route::Build => "/build".to_string(),
            Route::Fill { id } => format!("/forms/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
