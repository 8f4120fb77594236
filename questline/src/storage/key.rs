//! Opaque storage keys.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identity used to address values in a [`super::Storage`].
///
/// Keys have structural equality and hashing over a stable string identity,
/// so the same logical key can be declared in different compilation units.
/// The same key type addresses both plain values and sub-storages; the two
/// roles are disambiguated by the stored value kind at runtime.
///
/// Suites typically declare their keys as constants:
///
/// ```rust
/// use questline::storage::DataKey;
///
/// const RESPONSE: DataKey = DataKey::from_static("RESPONSE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataKey(Cow<'static, str>);

impl DataKey {
    /// Creates a key from a static name, usable in `const` contexts.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a key from an owned name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Returns the key's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for DataKey {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for DataKey {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_structural_equality() {
        const HOST: DataKey = DataKey::from_static("HOST");
        assert_eq!(HOST, DataKey::new("HOST"));
        assert_ne!(HOST, DataKey::from_static("PORT"));
    }

    #[test]
    fn test_usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(DataKey::from_static("HOST"), 1);
        assert_eq!(map.get(&DataKey::new(String::from("HOST"))), Some(&1));
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(DataKey::from_static("RESPONSE").to_string(), "RESPONSE");
    }
}
