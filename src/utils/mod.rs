//! Shared utility functions.

pub mod api_key;
pub mod crypto;
pub mod cursor;
pub mod jwt;
