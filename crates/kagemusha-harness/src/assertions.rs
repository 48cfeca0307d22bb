//! Custom assertions and assertion helpers for double-driven tests.

pub use assert_matches::assert_matches;
pub use pretty_assertions::{assert_eq, assert_ne};

/// Assert that a spy recorded exactly the given number of calls
#[macro_export]
macro_rules! assert_called {
    ($spy:expr, $times:expr) => {{
        let count = $spy.call_count();
        assert!(
            count == $times,
            "expected {} recorded calls, got {}",
            $times,
            count
        );
    }};
}

/// Assert that a result is an error whose message contains a substring
#[macro_export]
macro_rules! assert_error_contains {
    ($result:expr, $expected:expr) => {
        match $result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let error_msg = format!("{}", e);
                assert!(
                    error_msg.contains($expected),
                    "Expected error message to contain '{}', but got: '{}'",
                    $expected,
                    error_msg
                );
            }
        }
    };
}

/// Assert that a value matches a predicate
pub fn assert_that<T>(value: T, predicate: impl Fn(&T) -> bool, message: &str) {
    assert!(predicate(&value), "{}", message);
}
