use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque record identifier.
///
/// Rendered verbatim by `Display`; that rendering is what ends up inside
/// comment topic names, so it must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Fresh random identifier (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}
