//! Unique test data so tests sharing a store never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new())
}

/// `{prefix}-{ulid}@example.test`, lowercased the way the service stores it.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let a = unique_email("test");
/// assert_ne!(a, unique_email("test"));
/// assert!(a.starts_with("test-") && a.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.test", Ulid::new()).to_lowercase()
}
