//! Property-based test generators using proptest.
//!
//! Provides strategies for users and for sequences of engine operations.

use crate::fixtures::User;
use proptest::prelude::*;
use proptest::sample::Index;

/// One operation against the `User` table.
///
/// Operations that target an existing row carry an [`Index`] that the
/// harness resolves against the rows alive at that moment.
#[derive(Debug, Clone)]
pub enum UserOp {
    /// Save a new user.
    Save(User),
    /// Change the age of an existing row.
    Update {
        /// Which live row to update.
        target: Index,
        /// The new age.
        age: i64,
    },
    /// Remove an existing row.
    Remove(Index),
    /// Remove an arbitrary identifier, which may or may not exist.
    RemoveId(u64),
    /// Insert or overwrite a row at a chosen identifier.
    Replace(User),
    /// Look up an arbitrary identifier.
    FindOne(u64),
}

/// Strategy for generating usernames.
pub fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9_]{0,11}").expect("Invalid regex")
}

/// Strategy for generating users without an identifier.
pub fn user_strategy() -> impl Strategy<Value = User> {
    (username_strategy(), 0i64..120).prop_map(|(name, age)| User::new(name, age))
}

/// Strategy for generating users with an identifier in `1..max_id`.
pub fn user_with_id_strategy(max_id: u64) -> impl Strategy<Value = User> {
    (1..max_id, user_strategy()).prop_map(|(id, user)| User {
        id: Some(id),
        ..user
    })
}

/// Strategy for a single operation, weighted towards saves.
pub fn user_op_strategy() -> impl Strategy<Value = UserOp> {
    prop_oneof![
        4 => user_strategy().prop_map(UserOp::Save),
        2 => (any::<Index>(), 0i64..120).prop_map(|(target, age)| UserOp::Update { target, age }),
        2 => any::<Index>().prop_map(UserOp::Remove),
        1 => (0u64..40).prop_map(UserOp::RemoveId),
        1 => user_with_id_strategy(40).prop_map(UserOp::Replace),
        1 => (0u64..40).prop_map(UserOp::FindOne),
    ]
}

/// Strategy for a sequence of up to `max_len` operations.
pub fn user_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<UserOp>> {
    prop::collection::vec(user_op_strategy(), 0..max_len)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a quick configuration for fast tests.
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
