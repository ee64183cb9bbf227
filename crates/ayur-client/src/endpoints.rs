//! Backend paths, relative to the API base URL
//!
//! Collection paths live on each record's `Resource` impl; this module holds
//! the action and auxiliary endpoints around them.

use ayur_core::Resource;

/// Path of `{collection}/{id}/{action}` for a resource
pub fn member_action<R: Resource>(id: &str, action: &str) -> String {
    format!("{}/{}", R::member_path(id), action)
}

pub mod admin {
    use super::member_action;
    use ayur_models::{Appointment, Content, Notification, Patient, Practitioner, User};

    pub const DASHBOARD_STATS: &str = "/admin/dashboard/stats";
    pub const AUDIT_LOG_EXPORT: &str = "/admin/audit-logs/export";
    pub const REVENUE_SUMMARY: &str = "/admin/revenue/summary";
    pub const REVENUE_EXPORT: &str = "/admin/revenue/export";

    pub fn user_status(id: &str) -> String {
        member_action::<User>(id, "status")
    }

    pub fn practitioner_status(id: &str) -> String {
        member_action::<Practitioner>(id, "status")
    }

    pub fn practitioner_verification(id: &str) -> String {
        member_action::<Practitioner>(id, "verification")
    }

    pub fn patient_status(id: &str) -> String {
        member_action::<Patient>(id, "status")
    }

    pub fn appointment_status(id: &str) -> String {
        member_action::<Appointment>(id, "status")
    }

    pub fn notification_read(id: &str) -> String {
        member_action::<Notification>(id, "read")
    }

    pub fn content_status(id: &str) -> String {
        member_action::<Content>(id, "status")
    }
}

pub mod patient {
    pub const APPOINTMENTS: &str = "/patient/appointments";

    pub fn appointment(id: &str) -> String {
        format!("{APPOINTMENTS}/{id}")
    }

    pub fn cancel_appointment(id: &str) -> String {
        format!("{APPOINTMENTS}/{id}/cancel")
    }

    pub fn review_appointment(id: &str) -> String {
        format!("{APPOINTMENTS}/{id}/review")
    }
}
