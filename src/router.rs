//! Client Routes
//!
//! The four views of the client and their paths.

use std::fmt;

/// A client-side route
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// `/` - recent transactions
    #[default]
    List,
    /// `/add` - new weighing form
    Add,
    /// `/item/:id` - truck or container details
    Item(String),
    /// `/session/:id` - session details
    Session(String),
    /// Anything else
    NotFound(String),
}

impl Route {
    /// Resolve a path to a route; unknown paths map to `NotFound`
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let without_query = trimmed.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = without_query
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::List,
            ["add"] => Route::Add,
            ["item", id] => Route::Item(decode_segment(id)),
            ["session", id] => Route::Session(decode_segment(id)),
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    /// Route for the item search box: trims the input, ignores blank input
    pub fn search_item(input: &str) -> Option<Self> {
        let id = input.trim();
        if id.is_empty() {
            None
        } else {
            Some(Route::Item(id.to_string()))
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Add => "/add".to_string(),
            Route::Item(id) => format!("/item/{}", urlencoding::encode(id)),
            Route::Session(id) => format!("/session/{}", urlencoding::encode(id)),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Heading shown above the route's view
    pub fn title(&self) -> String {
        match self {
            Route::List => "Recent Transactions".to_string(),
            Route::Add => "New Transaction".to_string(),
            Route::Item(id) => format!("Item {}", id),
            Route::Session(id) => format!("Session {}", id),
            Route::NotFound(_) => "Page Not Found".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
