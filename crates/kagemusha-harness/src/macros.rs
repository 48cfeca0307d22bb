//! Test macros and utilities

/// Re-export commonly used test macros
pub use proptest::proptest;
pub use rstest::{fixture, rstest};
pub use test_case::test_case;
