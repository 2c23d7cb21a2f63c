//! Shared test utilities for storage and domain testing
//!
//! This crate provides reusable test infrastructure:
//! - `TestStorageDir`: temporary directory for file-backed stores, removed on drop
//! - `TestDataBuilder`: deterministic test data generation
//! - `assertions`: custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestStorageDir};
//!
//! let dir = TestStorageDir::new();
//! let builder = TestDataBuilder::from_test_name("my_test");
//!
//! let user_id = builder.user_id();
//! let name = builder.name("user", "main");
//! let store_root = dir.path();
//! ```

mod storage;

pub use storage::TestStorageDir;

use uuid::Uuid;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_user");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic user id in the hyphenated UUID form stored by the repository
    pub fn user_id(&self) -> String {
        self.uuid(0).to_string()
    }

    /// The `n`-th deterministic user id for this seed
    pub fn nth_user_id(&self, n: u64) -> String {
        self.uuid(n).to_string()
    }

    fn uuid(&self, n: u64) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let counter = n.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&counter);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(12345);
    /// assert_eq!(builder.name("user", "main"), "test-user-12345-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// An https image URL accepted by user validation
    pub fn image_url(&self, suffix: &str) -> String {
        format!("https://images.example.com/{}/{}.png", self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that two ids are equal with a nice error message
    pub fn assert_id_eq(actual: &str, expected: &str, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected id {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that an optional value is None
    pub fn assert_none<T: std::fmt::Debug>(value: Option<T>, context: &str) {
        if let Some(value) = value {
            panic!("{}: expected None, got {:?}", context, value);
        }
    }
}
