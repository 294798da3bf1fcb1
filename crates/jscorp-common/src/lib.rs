//! # jscorp-common
//!
//! Shared types, configuration, and the backend error envelope used across the
//! JSCORP HR client crates. No I/O lives here beyond reading configuration.

pub mod config;
pub mod error;
pub mod models;
