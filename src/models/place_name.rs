//! Normalized place names.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A normalized place name, used as the cache key and the geocoding query.
///
/// Normalization trims the input, treats `_` as a space, collapses runs of
/// whitespace and upper-cases the result, so `"brazil"`, `" Brazil "` and
/// `"BRAZIL"` are the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceName(String);

impl PlaceName {
    pub fn new(raw: &str) -> Self {
        let normalized = raw
            .replace('_', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lower-case, underscore-separated form (`"united_states"`)
    pub fn slug(&self) -> String {
        self.0.to_lowercase().replace(' ', "_")
    }
}

impl std::fmt::Display for PlaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaceName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PlaceName {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl AsRef<str> for PlaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for PlaceName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PlaceName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}
