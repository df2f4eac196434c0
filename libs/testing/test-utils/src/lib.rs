//! Shared test utilities for the forum crates
//!
//! - `TestDatabase`: pgvector PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data derived from the test name
//! - `assertions`: small assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!
//!     let username = builder.username("author");
//!     let slug = builder.slug("topic");
//! }
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Deterministic test data, so reruns of the same test produce the same values.
///
/// Values from different test names don't collide, which lets tests share a database.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds from a hash of the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_post");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A UUID derived from the seed and `label`.
    pub fn id(&self, label: &str) -> Uuid {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        label.hash(&mut hasher);
        let high = hasher.finish();
        label.len().hash(&mut hasher);
        let low = hasher.finish();

        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&high.to_le_bytes());
        bytes[8..].copy_from_slice(&low.to_le_bytes());
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    pub fn user_id(&self) -> Uuid {
        self.id("user")
    }

    /// `test-{prefix}-{seed}-{suffix}`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// assert!(builder.name("post", "main").starts_with("test-post-"));
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Username matching `[A-Za-z0-9_]{3,32}`.
    pub fn username(&self, suffix: &str) -> String {
        let mut name = format!("u{:x}_{}", self.seed % 0xffff_ffff, suffix);
        name.retain(|c| c.is_ascii_alphanumeric() || c == '_');
        name.truncate(32);
        name
    }

    pub fn email(&self, suffix: &str) -> String {
        format!("{}@example.test", self.username(suffix))
    }

    /// Topic slug matching `[a-z0-9_]+`.
    pub fn slug(&self, suffix: &str) -> String {
        self.username(suffix).to_ascii_lowercase()
    }
}

pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
