//! # Authentication Module
//!
//! Password hashing, session token issuance and validation, and the
//! middleware that gates the admin panel and the mutating API.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";
