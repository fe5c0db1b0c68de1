//! Interned identifiers for nodes, node kinds, and edge endpoints.
//!
//! Node ids arrive as strings from the palette and the renderer and are
//! compared constantly while building layout graphs, so they are interned
//! once and passed around as a `Copy` symbol.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`; the editor itself is single threaded, but
/// identifiers may be created from tests or hosts running on other threads.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned string identifier.
///
/// # Examples
///
/// ```
/// use pipecanvas_core::identifier::Id;
///
/// let fetch = Id::new("svc-fetch");
/// let again = Id::new("svc-fetch");
///
/// assert_eq!(fetch, again);
/// assert_eq!(fetch, "svc-fetch");
/// assert_eq!(fetch.to_string(), "svc-fetch");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the interned string as an owned `String`.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let value = interner.resolve(self.0).unwrap_or_default();
        f.write_str(value)
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        let interner = interner();
        interner.resolve(self.0) == Some(*other)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self == &other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_same_id() {
        let a = Id::new("detector");
        let b = Id::new("detector");
        let c = Id::new("tracker");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_and_str_comparison() {
        let id = Id::new("svc-1");
        assert_eq!(id.to_string(), "svc-1");
        assert_eq!(id, "svc-1");
        assert!(id != "svc-2");
    }

    #[test]
    fn test_from_str() {
        let id: Id = "generator".parse().unwrap();
        assert_eq!(id, Id::new("generator"));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = Id::new("svc-serde");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"svc-serde\"");

        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_empty_id() {
        let id = Id::new("");
        assert_eq!(id.to_string(), "");
        assert_eq!(id, "");
    }
}
