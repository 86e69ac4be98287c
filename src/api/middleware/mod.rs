//! Middleware components for request processing.
//!
//! This module contains middleware for logging, request ID tracking,
//! and authentication context extraction.

mod auth;
mod logging;
mod request_id;

pub use auth::{AuthContext, auth_context_middleware};
pub use logging::logging_middleware;
pub use request_id::{RequestId, request_id_middleware};
