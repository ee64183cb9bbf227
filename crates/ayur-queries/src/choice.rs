//! Dropdown selection: either "all" or a single value

use std::fmt;
use std::str::FromStr;

use ayur_models::{
    AppointmentStatus, AppointmentType, Audience, ContentStatus, ContentType, NotificationType,
    Role, Severity, TransactionStatus, TransactionType, VerificationStatus,
};

/// Sentinel the UI uses for "no filter"
pub const ALL: &str = "all";

/// Value of a categorical filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(v) => Some(v),
        }
    }
}

impl<T: PartialEq> Choice<T> {
    /// Whether a record with `value` passes this filter
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Choice::All, Choice::Only)
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

impl<T: WireLabel> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str(ALL),
            Choice::Only(v) => f.write_str(&v.wire_label()),
        }
    }
}

/// How a filter value is written into a query string
pub trait WireLabel {
    fn wire_label(&self) -> String;
}

impl WireLabel for String {
    fn wire_label(&self) -> String {
        self.clone()
    }
}

macro_rules! wire_label_via_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WireLabel for $ty {
                fn wire_label(&self) -> String {
                    self.as_str().to_string()
                }
            }
        )*
    };
}

wire_label_via_as_str!(
    Role,
    VerificationStatus,
    AppointmentStatus,
    AppointmentType,
    NotificationType,
    Severity,
    ContentType,
    ContentStatus,
    TransactionType,
    TransactionStatus,
);

impl WireLabel for Audience {
    fn wire_label(&self) -> String {
        match self {
            Audience::All => "all",
            Audience::Admins => "admins",
            Audience::Practitioners => "practitioners",
            Audience::Patients => "patients",
        }
        .to_string()
    }
}
