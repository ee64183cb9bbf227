//! List filters
//!
//! Every list screen has a search box plus one to three dropdowns. Each resource
//! gets its own filter struct naming exactly the keys that screen understands;
//! all conditions are ANDed. `FieldFilters` keeps the untyped key/value form for
//! ad-hoc filtering of mock data.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use ayur_core::traits::{Id, Resource};
use ayur_core::types::DateRange;
use ayur_models::{
    Appointment, AppointmentStatus, AuditLog, Content, ContentStatus, ContentType, Notification,
    NotificationType, Patient, Practitioner, Role, Severity, Transaction, TransactionStatus,
    TransactionType, User, VerificationStatus,
};

use crate::choice::{Choice, WireLabel, ALL};
use crate::search::{matches_search, stringify};

/// Query-string keys shared by several filters
pub mod keys {
    pub const SEARCH: &str = "search";
    pub const STATUS: &str = "status";
    pub const ROLE: &str = "role";
    pub const TYPE: &str = "type";
    pub const DATE: &str = "date";
    pub const START_DATE: &str = "startDate";
    pub const END_DATE: &str = "endDate";
    pub const VERIFICATION_STATUS: &str = "verificationStatus";
    pub const SPECIALIZATION: &str = "specialization";
    pub const PRACTITIONER_ID: &str = "practitionerId";
    pub const SEVERITY: &str = "severity";
    pub const ACTION: &str = "action";
}

/// Filter values rendered as query-string pairs
///
/// Values left at "all" or empty are omitted. Paging keys are not included.
pub trait QueryParams {
    fn query_pairs(&self) -> Vec<(String, String)>;
}

/// A filter that can also be evaluated locally against records
pub trait RecordFilter<R>: QueryParams + Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Whether `record` passes every active condition
    fn matches(&self, record: &R) -> bool;

    fn search_text(&self) -> &str;

    fn set_search(&mut self, text: String);
}

/// Binds a resource to the filter its list screen uses
pub trait Filterable: Resource {
    type Filter: RecordFilter<Self>;
}

fn push_search(pairs: &mut Vec<(String, String)>, search: &str) {
    if !search.is_empty() {
        pairs.push((keys::SEARCH.to_string(), search.to_string()));
    }
}

fn push_choice<T: WireLabel>(pairs: &mut Vec<(String, String)>, key: &str, choice: &Choice<T>) {
    if let Choice::Only(value) = choice {
        pairs.push((key.to_string(), value.wire_label()));
    }
}

fn push_range(pairs: &mut Vec<(String, String)>, range: &DateRange) {
    if let Some(from) = range.from {
        pairs.push((keys::START_DATE.to_string(), from.to_string()));
    }
    if let Some(to) = range.to {
        pairs.push((keys::END_DATE.to_string(), to.to_string()));
    }
}

/// Active/inactive dropdown used by account screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveState {
    Active,
    Inactive,
}

impl ActiveState {
    pub fn admits(&self, is_active: bool) -> bool {
        match self {
            Self::Active => is_active,
            Self::Inactive => !is_active,
        }
    }
}

impl FromStr for ActiveState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown value: {other}")),
        }
    }
}

impl WireLabel for ActiveState {
    fn wire_label(&self) -> String {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
        .to_string()
    }
}

/// Read/unread dropdown of the notification center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadState {
    Read,
    Unread,
}

impl FromStr for ReadState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "read" => Ok(Self::Read),
            "unread" => Ok(Self::Unread),
            other => Err(format!("unknown value: {other}")),
        }
    }
}

impl WireLabel for ReadState {
    fn wire_label(&self) -> String {
        match self {
            Self::Read => "read",
            Self::Unread => "unread",
        }
        .to_string()
    }
}

fn admits_active(choice: &Choice<ActiveState>, is_active: bool) -> bool {
    choice.value().map_or(true, |state| state.admits(is_active))
}

// ---------------------------------------------------------------------------
// Users

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub search: String,
    pub role: Choice<Role>,
    pub status: Choice<ActiveState>,
}

impl QueryParams for UserFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        push_choice(&mut pairs, keys::ROLE, &self.role);
        push_choice(&mut pairs, keys::STATUS, &self.status);
        pairs
    }
}

impl RecordFilter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        self.role.admits(&user.role)
            && admits_active(&self.status, user.is_active)
            && matches_search(user, &self.search)
    }

    fn search_text(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }
}

impl Filterable for User {
    type Filter = UserFilter;
}

// ---------------------------------------------------------------------------
// Practitioners

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PractitionerFilter {
    pub search: String,
    pub verification_status: Choice<VerificationStatus>,
    pub specialization: Choice<String>,
}

impl QueryParams for PractitionerFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        push_choice(&mut pairs, keys::VERIFICATION_STATUS, &self.verification_status);
        push_choice(&mut pairs, keys::SPECIALIZATION, &self.specialization);
        pairs
    }
}

impl RecordFilter<Practitioner> for PractitionerFilter {
    fn matches(&self, p: &Practitioner) -> bool {
        self.verification_status.admits(&p.verification_status)
            && self.specialization.admits(&p.specialization)
            && matches_search(p, &self.search)
    }

    fn search_text(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }
}

impl Filterable for Practitioner {
    type Filter = PractitionerFilter;
}

// ---------------------------------------------------------------------------
// Patients

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientFilter {
    pub search: String,
    pub status: Choice<ActiveState>,
}

impl QueryParams for PatientFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        push_choice(&mut pairs, keys::STATUS, &self.status);
        pairs
    }
}

impl RecordFilter<Patient> for PatientFilter {
    fn matches(&self, patient: &Patient) -> bool {
        admits_active(&self.status, patient.is_active) && matches_search(patient, &self.search)
    }

    fn search_text(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }
}

impl Filterable for Patient {
    type Filter = PatientFilter;
}

// ---------------------------------------------------------------------------
// Appointments

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub search: String,
    pub status: Choice<AppointmentStatus>,
    /// Day the appointment starts on
    pub date: Option<NaiveDate>,
    pub practitioner_id: Option<Id>,
}

impl QueryParams for AppointmentFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        push_choice(&mut pairs, keys::STATUS, &self.status);
        if let Some(date) = self.date {
            pairs.push((keys::DATE.to_string(), date.to_string()));
        }
        if let Some(id) = &self.practitioner_id {
            pairs.push((keys::PRACTITIONER_ID.to_string(), id.clone()));
        }
        pairs
    }
}

impl RecordFilter<Appointment> for AppointmentFilter {
    fn matches(&self, a: &Appointment) -> bool {
        self.status.admits(&a.status)
            && self.date.map_or(true, |d| a.date() == d)
            && self
                .practitioner_id
                .as_ref()
                .map_or(true, |id| &a.practitioner.id == id)
            && matches_search(a, &self.search)
    }

    fn search_text(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }
}

impl Filterable for Appointment {
    type Filter = AppointmentFilter;
}

// ---------------------------------------------------------------------------
// Notifications

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFilter {
    pub search: String,
    pub notification_type: Choice<NotificationType>,
    pub read: Choice<ReadState>,
}

impl QueryParams for NotificationFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        push_choice(&mut pairs, keys::TYPE, &self.notification_type);
        push_choice(&mut pairs, keys::STATUS, &self.read);
        pairs
    }
}

impl RecordFilter<Notification> for NotificationFilter {
    fn matches(&self, n: &Notification) -> bool {
        let read_ok = match self.read {
            Choice::All => true,
            Choice::Only(ReadState::Read) => n.is_read,
            Choice::Only(ReadState::Unread) => !n.is_read,
        };
        read_ok && self.notification_type.admits(&n.notification_type) && matches_search(n, &self.search)
    }

    fn search_text(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }
}

impl Filterable for Notification {
    type Filter = NotificationFilter;
}

// ---------------------------------------------------------------------------
// Audit logs

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogFilter {
    pub search: String,
    pub action: Choice<String>,
    pub severity: Choice<Severity>,
    pub date_range: DateRange,
}

impl QueryParams for AuditLogFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        push_choice(&mut pairs, keys::ACTION, &self.action);
        push_choice(&mut pairs, keys::SEVERITY, &self.severity);
        push_range(&mut pairs, &self.date_range);
        pairs
    }
}

impl RecordFilter<AuditLog> for AuditLogFilter {
    fn matches(&self, log: &AuditLog) -> bool {
        self.action.admits(&log.action)
            && self.severity.admits(&log.severity)
            && self.date_range.contains(log.timestamp.date_naive())
            && matches_search(log, &self.search)
    }

    fn search_text(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }
}

impl Filterable for AuditLog {
    type Filter = AuditLogFilter;
}

// ---------------------------------------------------------------------------
// Content

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFilter {
    pub search: String,
    pub content_type: Choice<ContentType>,
    pub status: Choice<ContentStatus>,
}

impl QueryParams for ContentFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        push_choice(&mut pairs, keys::TYPE, &self.content_type);
        push_choice(&mut pairs, keys::STATUS, &self.status);
        pairs
    }
}

impl RecordFilter<Content> for ContentFilter {
    fn matches(&self, c: &Content) -> bool {
        self.content_type.admits(&c.content_type)
            && self.status.admits(&c.status)
            && matches_search(c, &self.search)
    }

    fn search_text(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }
}

impl Filterable for Content {
    type Filter = ContentFilter;
}

// ---------------------------------------------------------------------------
// Transactions

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub search: String,
    pub status: Choice<TransactionStatus>,
    pub transaction_type: Choice<TransactionType>,
    pub date_range: DateRange,
}

impl QueryParams for TransactionFilter {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        push_choice(&mut pairs, keys::STATUS, &self.status);
        push_choice(&mut pairs, keys::TYPE, &self.transaction_type);
        push_range(&mut pairs, &self.date_range);
        pairs
    }
}

impl RecordFilter<Transaction> for TransactionFilter {
    fn matches(&self, tx: &Transaction) -> bool {
        self.status.admits(&tx.status)
            && self.transaction_type.admits(&tx.transaction_type)
            && self.date_range.contains(tx.created_at.date_naive())
            && matches_search(tx, &self.search)
    }

    fn search_text(&self) -> &str {
        &self.search
    }

    fn set_search(&mut self, text: String) {
        self.search = text;
    }
}

impl Filterable for Transaction {
    type Filter = TransactionFilter;
}

// ---------------------------------------------------------------------------
// Untyped

/// Key/value filters compared against a record's serialized fields
///
/// Keys with an empty or `"all"` value are inactive. `search` is free text;
/// every other key keeps records whose field of that name, stringified, equals
/// the value exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilters {
    entries: BTreeMap<String, String>,
}

impl FieldFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Entries that actually constrain the result
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .filter(|(_, v)| !v.is_empty() && *v != ALL)
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Parse `key=value` pairs, e.g. from the command line
    pub fn parse_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<Self, String> {
        let mut filters = Self::new();
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got `{pair}`"))?;
            filters.set(key.trim(), value.trim());
        }
        Ok(filters)
    }
}

impl QueryParams for FieldFilters {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.active()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

impl<R: Serialize> RecordFilter<R> for FieldFilters {
    fn matches(&self, record: &R) -> bool {
        let value = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(_) => return false,
        };
        self.active().all(|(key, expected)| {
            if key == keys::SEARCH {
                return matches_search(&value, expected);
            }
            value
                .get(key)
                .and_then(stringify)
                .map_or(false, |actual| actual == expected)
        })
    }

    fn search_text(&self) -> &str {
        self.get(keys::SEARCH).unwrap_or("")
    }

    fn set_search(&mut self, text: String) {
        self.set(keys::SEARCH, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: &str, name: &str, role: &str, active: bool) -> User {
        serde_json::from_value(json!({
            "id": id, "name": name, "email": format!("{id}@example.com"),
            "role": role, "isActive": active
        }))
        .unwrap()
    }

    fn appointment(id: &str, status: &str, start: &str, practitioner: &str) -> Appointment {
        serde_json::from_value(json!({
            "id": id,
            "patient": {"id": "pt1", "name": "Kiran Rao"},
            "practitioner": {"id": practitioner, "name": "Dr. Meera"},
            "startTime": start, "endTime": start,
            "type": "consultation", "status": status
        }))
        .unwrap()
    }

    #[test]
    fn test_user_filter_combines_conditions() {
        let users = vec![
            user("1", "Asha Admin", "admin", true),
            user("2", "Ravi Patient", "patient", true),
            user("3", "Sita Patient", "patient", false),
        ];
        let filter = UserFilter {
            role: Choice::Only(Role::Patient),
            status: Choice::Only(ActiveState::Active),
            ..Default::default()
        };
        let hits: Vec<_> = users.iter().filter(|u| filter.matches(u)).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[test]
    fn test_user_filter_query_pairs_skip_all() {
        let filter = UserFilter {
            search: "  ravi ".into(),
            role: Choice::All,
            status: Choice::Only(ActiveState::Inactive),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("search".to_string(), "  ravi ".to_string()),
                ("status".to_string(), "inactive".to_string()),
            ]
        );
        assert!(UserFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn test_appointment_filter_by_date_and_practitioner() {
        let list = vec![
            appointment("a1", "scheduled", "2024-03-10T09:00:00Z", "p1"),
            appointment("a2", "scheduled", "2024-03-11T09:00:00Z", "p1"),
            appointment("a3", "cancelled", "2024-03-10T11:00:00Z", "p2"),
        ];
        let filter = AppointmentFilter {
            date: NaiveDate::from_ymd_opt(2024, 3, 10),
            ..Default::default()
        };
        assert_eq!(list.iter().filter(|a| filter.matches(a)).count(), 2);

        let filter = AppointmentFilter {
            practitioner_id: Some("p1".into()),
            status: Choice::Only(AppointmentStatus::Scheduled),
            ..Default::default()
        };
        assert_eq!(list.iter().filter(|a| filter.matches(a)).count(), 2);
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("status".to_string(), "scheduled".to_string()),
                ("practitionerId".to_string(), "p1".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_reaches_embedded_party() {
        let a = appointment("a1", "scheduled", "2024-03-10T09:00:00Z", "p1");
        let filter = AppointmentFilter {
            search: "KIRAN".into(),
            ..Default::default()
        };
        assert!(filter.matches(&a));
    }

    #[test]
    fn test_audit_filter_date_range_pairs() {
        let filter = AuditLogFilter {
            severity: Choice::Only(Severity::Critical),
            date_range: DateRange::new(NaiveDate::from_ymd_opt(2024, 1, 1), None),
            ..Default::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("severity".to_string(), "critical".to_string()),
                ("startDate".to_string(), "2024-01-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_notification_read_state() {
        let n: Notification = serde_json::from_value(json!({
            "id": "n1", "title": "Reminder", "message": "Therapy at 10",
            "type": "reminder", "isRead": false
        }))
        .unwrap();
        let unread = NotificationFilter {
            read: Choice::Only(ReadState::Unread),
            ..Default::default()
        };
        let read = NotificationFilter {
            read: Choice::Only(ReadState::Read),
            ..Default::default()
        };
        assert!(unread.matches(&n));
        assert!(!read.matches(&n));
    }

    #[test]
    fn test_field_filters_exact_and_search() {
        let users = vec![
            user("1", "Asha Admin", "admin", true),
            user("2", "Ravi Patient", "patient", true),
            user("3", "Sita Patient", "patient", false),
        ];
        let filters = FieldFilters::new()
            .with("role", "patient")
            .with("isActive", "all")
            .with("search", "SITA");
        let hits: Vec<_> = users
            .iter()
            .filter(|u| RecordFilter::<User>::matches(&filters, u))
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "3");

        let bools = FieldFilters::new().with("isActive", "false");
        assert_eq!(
            users
                .iter()
                .filter(|u| RecordFilter::<User>::matches(&bools, u))
                .count(),
            1
        );
    }

    #[test]
    fn test_field_filters_unknown_key_excludes() {
        let u = user("1", "Asha", "admin", true);
        let filters = FieldFilters::new().with("department", "ortho");
        assert!(!RecordFilter::<User>::matches(&filters, &u));
    }

    #[test]
    fn test_field_filters_parse_pairs() {
        let filters = FieldFilters::parse_pairs(["status=verified", "search = meera"]).unwrap();
        assert_eq!(filters.get("status"), Some("verified"));
        assert_eq!(filters.get("search"), Some("meera"));
        assert!(FieldFilters::parse_pairs(["oops"]).is_err());
    }
}
