//! Lightweight reference to another record embedded in a payload

use ayur_core::traits::Id;
use serde::{Deserialize, Serialize};

/// `{ id, name }` pair the backend embeds instead of a full record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartyRef {
    #[serde(alias = "_id")]
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PartyRef {
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }
}
