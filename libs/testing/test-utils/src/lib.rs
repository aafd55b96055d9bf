//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for the domain crates:
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let username = builder.username("main");
//!     let email = builder.email("main");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

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

    /// Username unique to this builder's seed
    pub fn username(&self, suffix: &str) -> String {
        format!("user_{}_{}", self.seed, suffix)
    }

    /// Email address unique to this builder's seed
    pub fn email(&self, suffix: &str) -> String {
        format!("{}@example.com", self.username(suffix))
    }

    /// Age in 18..=99 derived from the seed
    pub fn age(&self) -> i32 {
        18 + (self.seed % 82) as i32
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that an optional value is None
    pub fn assert_none<T: std::fmt::Debug>(value: Option<T>, context: &str) {
        if let Some(v) = value {
            panic!("{}: expected None, got Some({:?})", context, v);
        }
    }
}
