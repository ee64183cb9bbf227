//! # ayur-queries
//!
//! Filtering and query-string layer for the portal's list screens.
//!
//! ## Structure
//!
//! - `choice` - the "all or one value" selector behind every dropdown filter
//! - `search` - case-insensitive free-text match over a record's fields
//! - `filters` - one filter struct per resource, plus the untyped `FieldFilters`
//! - `query` - a page request plus filter, rendered as a query string
//!
//! ## Example
//!
//! ```
//! use ayur_models::{Practitioner, VerificationStatus};
//! use ayur_queries::{Choice, ListQuery, PractitionerFilter};
//! use ayur_core::PageRequest;
//!
//! let filter = PractitionerFilter {
//!     verification_status: Choice::Only(VerificationStatus::Verified),
//!     ..Default::default()
//! };
//! let query = ListQuery::new(PageRequest::new(2, 10), filter);
//! assert_eq!(query.to_query_string(), "page=2&limit=10&verificationStatus=verified");
//! ```

pub mod choice;
pub mod filters;
pub mod query;
pub mod search;

// Re-exports for convenience
pub use choice::{Choice, WireLabel};
pub use filters::{
    ActiveState, AppointmentFilter, AuditLogFilter, ContentFilter, FieldFilters, Filterable,
    NotificationFilter, PatientFilter, PractitionerFilter, QueryParams, ReadState,
    RecordFilter, TransactionFilter, UserFilter,
};
pub use query::ListQuery;
pub use search::matches_search;
