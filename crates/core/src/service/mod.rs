//! Application services: the operations the HTTP layer calls.
//!
//! Each function is generic over the repository traits and returns
//! [`ServiceError`](crate::error::ServiceError), so repository failures
//! reach the caller untouched.

pub mod node;
pub mod tree;
