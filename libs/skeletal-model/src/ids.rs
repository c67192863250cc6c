//! # Identifier Helpers
//!
//! Snapshot entities are keyed by UUID strings. The mirror preprocessor
//! derives twin identifiers by reversing the hex digits of the source id,
//! so regeneration of a mirrored document is stable across runs.

use uuid::Uuid;

/// The nil UUID string used as the virtual root component id.
pub fn nil_uuid_string() -> String {
    Uuid::nil().to_string()
}

/// Parses `value` as a UUID, rejecting the nil UUID.
///
/// Attribute slots like `cutFace` hold either a UUID reference or a preset
/// name; a failed parse simply means "not a reference".
pub fn parse_non_nil_uuid(value: &str) -> Option<Uuid> {
    match Uuid::parse_str(value) {
        Ok(id) if !id.is_nil() => Some(id),
        _ => None,
    }
}

/// Derives a twin identifier by reversing the 32 hex digits of a UUID string.
///
/// The reversal is a bijection on hex strings and never maps an id onto
/// itself unless the digits form a palindrome, so twin ids are stable and
/// collision-free against their sources.
///
/// # Example
///
/// ```rust
/// use skeletal_model::reverse_uuid;
///
/// let id = "01234567-89ab-cdef-0123-456789abcdef";
/// let twin = reverse_uuid(id);
/// assert_eq!(twin, "fedcba98-7654-3210-fedc-ba9876543210");
/// assert_eq!(reverse_uuid(&twin), id);
/// ```
pub fn reverse_uuid(value: &str) -> String {
    let raw: String = value.chars().filter(|c| *c != '-').collect();
    let reversed: String = raw.chars().rev().collect();
    if reversed.len() != 32 {
        // Not a UUID shape; still deterministic and reversible.
        return reversed;
    }
    format!(
        "{}-{}-{}-{}-{}",
        &reversed[0..8],
        &reversed[8..12],
        &reversed[12..16],
        &reversed[16..20],
        &reversed[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_uuid_string() {
        assert_eq!(nil_uuid_string(), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_parse_non_nil_uuid() {
        assert!(parse_non_nil_uuid("f1f2a7d0-1c3e-4f5a-9b8c-0d1e2f3a4b5c").is_some());
        assert!(parse_non_nil_uuid(&nil_uuid_string()).is_none());
        assert!(parse_non_nil_uuid("Hexagon").is_none());
        assert!(parse_non_nil_uuid("").is_none());
    }

    #[test]
    fn test_reverse_uuid_is_involution() {
        let id = Uuid::new_v4().to_string();
        let twin = reverse_uuid(&id);
        assert_ne!(twin, id);
        assert_eq!(reverse_uuid(&twin), id);
    }

    #[test]
    fn test_reverse_uuid_parses_back() {
        let id = Uuid::new_v4().to_string();
        let twin = reverse_uuid(&id);
        assert!(Uuid::parse_str(&twin).is_ok());
    }
}
