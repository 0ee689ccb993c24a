//! Notification Module
//!
//! - **`dispatcher`** - `NotificationDispatcher` trait with the HTTP and log-only
//!   implementations, and the best-effort dispatch helper
//! - **`function`** - the email function endpoint itself (logs only)

pub mod dispatcher;
pub mod function;

pub use dispatcher::{
    dispatch_best_effort, DispatchError, HttpFunctionDispatcher, LogDispatcher, NotificationDispatcher,
};
pub use function::send_notification_email;
