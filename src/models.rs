// Data structures (User, StreamRequest, MessageEvent)

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// User record as held by the user store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Assigned by the store on first save
    pub id: Option<String>,
    pub name: String,
}

impl User {
    /// A user that has not been persisted yet
    pub fn unsaved(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

// Path parameter of the streaming route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    pub name: String,
}

impl StreamRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// SSE payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageEvent {
    pub message: String,
}

impl MessageEvent {
    /// Build the greeting for `name` stamped with `at`
    pub fn greeting(name: &str, at: DateTime<Utc>) -> Self {
        Self {
            message: format!("Hello {} @ {}", name, format_instant(at)),
        }
    }
}

/// Render an instant as RFC 3339 UTC with a `Z` suffix
pub fn format_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
