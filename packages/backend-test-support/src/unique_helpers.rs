//! Test helpers for generating unique test data
//!
//! ULID-suffixed values keep tests isolated when they share a store.

use ulid::Ulid;

/// Generate a unique string with the given prefix, e.g. `alice-01J...`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("user");
/// let id2 = unique_str("user");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address with the given prefix.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("test");
/// assert!(email.ends_with("@example.test"));
/// assert!(email.starts_with("test-"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}

/// Generate a unique username. Usernames are lowercase and contain no `@`.
pub fn unique_username(prefix: &str) -> String {
    unique_str(prefix).to_lowercase()
}
