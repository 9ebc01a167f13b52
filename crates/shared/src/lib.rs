//! Shared types, identity, and configuration for Curia.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Caller identity and role hierarchy
//! - Configuration management

pub mod auth;
pub mod config;
pub mod types;

pub use auth::{Caller, Role};
pub use config::AppConfig;
