use std::fmt;

/// The three pages of the app plus a catch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Manage,
    Lottery,
    NotFound(String),
}

impl Route {
    /// Resolve a path. Trailing slashes are ignored; anything unknown is `NotFound`.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');

        match normalized {
            "" => Route::Landing,
            "/manage" => Route::Manage,
            "/lottery" => Route::Lottery,
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Landing => "/",
            Route::Manage => "/manage",
            Route::Lottery => "/lottery",
            Route::NotFound(path) => path.as_str(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Lucky Draw",
            Route::Manage => "Manage Participants",
            Route::Lottery => "Lottery Draw",
            Route::NotFound(_) => "Page Not Found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths() {
        assert_eq!(Route::from_path("/"), Route::Landing);
        assert_eq!(Route::from_path(""), Route::Landing);
        assert_eq!(Route::from_path("/manage"), Route::Manage);
        assert_eq!(Route::from_path("/lottery/"), Route::Lottery);
    }

    #[test]
    fn test_unknown_paths_are_not_found() {
        assert_eq!(
            Route::from_path("/history"),
            Route::NotFound("/history".to_string())
        );
        assert_eq!(
            Route::from_path("manage"),
            Route::NotFound("manage".to_string())
        );
        assert!(matches!(
            Route::from_path("/lottery/extra"),
            Route::NotFound(_)
        ));
    }

    #[test]
    fn test_path_round_trips_for_pages() {
        for route in [Route::Landing, Route::Manage, Route::Lottery] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }
}
