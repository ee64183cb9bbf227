//! Core traits shared by every record the portal displays

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Backend identifier. Opaque to the portal.
pub type Id = String;

/// Trait for records that carry an identifier
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Trait for records with timestamps
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// A backend-managed record type exposed through a REST collection
///
/// Screens only ever hold transient copies of these; the backend owns them.
pub trait Resource:
    Identifiable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Human-readable type name for logs and errors
    const TYPE_NAME: &'static str;

    /// Collection path, e.g. `/admin/users`
    const COLLECTION_PATH: &'static str;

    /// Path of a single member of the collection
    fn member_path(id: &str) -> String {
        format!("{}/{}", Self::COLLECTION_PATH, id)
    }
}
