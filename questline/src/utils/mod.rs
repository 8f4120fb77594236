//! Utility functions for UUID generation, timestamps and type names.

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Returns the current time as an RFC3339/ISO timestamp.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Returns the unqualified name of a type, for diagnostics.
///
/// Strips the module path from `std::any::type_name`, so
/// `my_suite::worlds::BrowserWorld` becomes `BrowserWorld`.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    #[test]
    fn test_generate_uuid_is_v4() {
        let id = generate_uuid();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.contains(':'));
    }

    #[test]
    fn test_short_type_name_strips_path() {
        assert_eq!(short_type_name::<Probe>(), "Probe");
        assert_eq!(short_type_name::<String>(), "String");
    }
}
