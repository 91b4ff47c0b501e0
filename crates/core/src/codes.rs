//! Synthetic code generation for user-authored catalog items.
//!
//! Administrator-maintained catalog codes follow conventions like
//! `01-D-01`. User-created items need a code in the same namespace that can
//! never collide with those, so they get a reserved prefix plus a
//! millisecond timestamp and a short random suffix.

use rand::distr::{Alphanumeric, SampleString};

/// Prefix reserved for user-authored item codes.
pub const CUSTOM_CODE_PREFIX: &str = "USR-";

/// Length of the random suffix appended after the timestamp.
const SUFFIX_LEN: usize = 4;

/// Generate a unique code for a user-authored item.
///
/// Format: `USR-{unix_millis}-{4 alphanumeric chars}`.
pub fn generate_custom_code() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = Alphanumeric.sample_string(&mut rand::rng(), SUFFIX_LEN);
    format!("{CUSTOM_CODE_PREFIX}{millis}-{suffix}")
}

/// Whether a code belongs to the user-authored namespace.
pub fn is_custom_code(code: &str) -> bool {
    code.starts_with(CUSTOM_CODE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_carry_the_reserved_prefix() {
        let code = generate_custom_code();
        assert!(code.starts_with(CUSTOM_CODE_PREFIX));
        assert!(is_custom_code(&code));
    }

    #[test]
    fn administrator_codes_are_not_custom() {
        assert!(!is_custom_code("01-D-01"));
        assert!(!is_custom_code("02-A-14"));
    }

    #[test]
    fn consecutive_codes_differ() {
        let a = generate_custom_code();
        let b = generate_custom_code();
        assert_ne!(a, b);
    }

    #[test]
    fn code_has_timestamp_and_suffix_segments() {
        let code = generate_custom_code();
        let rest = code.strip_prefix(CUSTOM_CODE_PREFIX).unwrap();
        let (millis, suffix) = rest.split_once('-').expect("timestamp-suffix separator");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 4);
    }
}
