//! Custom assertion macros and utilities
//!
//! Provides enhanced assertion macros for better test output and
//! more descriptive error messages.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is an error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        assert!($result.is_err(), "Expected Err, got Ok");
    };
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => panic!("Expected different error variant, got: {:?}", e),
        }
    };
}

/// Assert a response status, printing the body on mismatch
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {{
        let (status, body) = $response;
        assert_eq!(status, $status, "unexpected status, body: {}", body);
        body
    }};
}

/// Assert that an error body carries the given status and a message
#[macro_export]
macro_rules! assert_error_body {
    ($body:expr, $code:expr) => {{
        assert_eq!($body["status"], serde_json::json!($code), "body: {}", $body);
        assert!($body["error"].as_str().map(|s| !s.is_empty()).unwrap_or(false), "body: {}", $body);
    }};
}
