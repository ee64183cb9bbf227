//! # ayur-mock
//!
//! In-memory stand-in for the backend, used while it is unreachable during
//! development and demos.
//!
//! - `fixtures` - seeded records for every resource
//! - `helpers` - `simulate_api_delay`, `filter_data`, `generate_paginated_response`

pub mod fixtures;
pub mod helpers;

pub use fixtures::{
    mock_appointments, mock_audit_logs, mock_content, mock_notifications, mock_patients,
    mock_practitioners, mock_transactions, mock_users, Fixture,
};
pub use helpers::{filter_data, generate_paginated_response, simulate_api_delay};
