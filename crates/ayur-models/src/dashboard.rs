//! Admin dashboard counters (`GET /admin/dashboard/stats`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_practitioners: u64,
    pub pending_verifications: u64,
    pub total_patients: u64,
    pub appointments_today: u64,
    pub upcoming_appointments: u64,
    pub monthly_revenue: f64,
    pub unread_notifications: u64,
}
