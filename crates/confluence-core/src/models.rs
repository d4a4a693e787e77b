//! Domain models for Confluence.
//!
//! These are the core types shared across all crates.

pub mod application;
pub mod identity;
pub mod session;
