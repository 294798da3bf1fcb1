use serde::{Deserialize, Serialize};

/// Aggregates served by `GET /api/dashboard/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_employees: u64,
    pub active_employees: u64,
    pub department_count: u64,
    pub pay_group_count: u64,
    pub pay_run_count: u64,
    pub leave_requests_pending: u64,
    #[serde(default)]
    pub turnover_rate: f64,
    #[serde(default)]
    pub total_payroll: f64,
}
