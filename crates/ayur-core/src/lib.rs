//! # ayur-core
//!
//! Core types, traits, and utilities for the AyurSutra portal.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - The portal error type and result alias
//! - Entity traits (Identifiable, Timestamped, Resource)
//! - Pagination math and page envelopes
//! - Shared value types (money, date ranges)
//! - Configuration types

pub mod config;
pub mod error;
pub mod pagination;
pub mod result;
pub mod traits;
pub mod types;

pub use error::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
pub use types::*;
