//! Navigation targets produced by the search box

use crate::suburbs::Suggestion;
use std::fmt;

/// Page the front-end should navigate to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/explore/:query`
    Explore(String),
    /// `/suburb/:suburbId`
    Suburb(u64),
}

impl Route {
    /// Route for a picked suggestion: its suburb page when the id is known,
    /// otherwise an explore page for its label
    pub fn for_selection(suggestion: &Suggestion) -> Self {
        match suggestion.suburb_id {
            Some(id) => Route::Suburb(id),
            None => Route::Explore(suggestion.label()),
        }
    }

    /// Path with free text percent-encoded
    pub fn path(&self) -> String {
        match self {
            Route::Explore(query) => format!("/explore/{}", urlencoding::encode(query)),
            Route::Suburb(id) => format!("/suburb/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explore_path_is_encoded() {
        assert_eq!(
            Route::Explore("st kilda".to_string()).path(),
            "/explore/st%20kilda"
        );
        assert_eq!(
            Route::Explore("a/b?c".to_string()).to_string(),
            "/explore/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_route_for_selection() {
        let with_id = Suggestion {
            suburb_id: Some(101),
            name: Some("Sydney".to_string()),
            ..Default::default()
        };
        assert_eq!(Route::for_selection(&with_id).path(), "/suburb/101");

        let without_id = Suggestion {
            name: Some("Sydney".to_string()),
            state: Some("NSW".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Route::for_selection(&without_id).path(),
            "/explore/Sydney%2C%20NSW"
        );
    }
}
