//! Initial data load after login.
//!
//! All reads are issued together and every one runs to completion; a failure
//! in one never cancels the others. Whatever loaded is kept, and the failures
//! are reported together.

use std::fmt;

use chrono::Utc;
use jscorp_common::models::*;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::gateway::Gateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Employees,
    Departments,
    PayGroups,
    PayItems,
    Attendance,
    PayRuns,
    PayResults,
    DashboardStats,
    WorkTypes,
    LeaveRequests,
}

impl Resource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Departments => "departments",
            Self::PayGroups => "pay groups",
            Self::PayItems => "pay items",
            Self::Attendance => "attendance",
            Self::PayRuns => "pay runs",
            Self::PayResults => "pay results",
            Self::DashboardStats => "dashboard stats",
            Self::WorkTypes => "work types",
            Self::LeaveRequests => "leave requests",
        }
    }
}

/// Everything the authenticated view renders from.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
    pub pay_groups: Vec<PayGroup>,
    pub pay_items: Vec<PayItem>,
    pub attendance: Vec<AttendanceSummary>,
    pub pay_runs: Vec<PayRun>,
    /// Newest run, whose results are in `pay_results`.
    pub selected_run: Option<i64>,
    pub pay_results: Vec<PayResult>,
    pub stats: Option<DashboardStats>,
    pub work_types: Vec<WorkType>,
    pub leave_requests: Vec<LeaveRequest>,
    pub current_user: Option<User>,
}

#[derive(Debug)]
pub struct BootstrapError {
    pub failures: Vec<(Resource, ApiError)>,
    /// The loads that did succeed.
    pub partial: Snapshot,
}

impl BootstrapError {
    /// First failure in load order; what a single-line banner shows.
    pub fn first(&self) -> Option<&ApiError> {
        self.failures.first().map(|(_, e)| e)
    }
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.failures.iter().map(|(r, _)| r.label()).collect();
        write!(f, "Failed to load {}", names.join(", "))?;
        if let Some(first) = self.first() {
            write!(f, ": {first}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BootstrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.first().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Current month as `YYYYMM` (UTC).
pub fn current_year_month() -> String {
    Utc::now().format("%Y%m").to_string()
}

impl Gateway {
    /// Load the full snapshot for `year_month`. Logged-out sessions get an
    /// empty snapshot without any request.
    pub async fn bootstrap(&self, year_month: &str) -> std::result::Result<Snapshot, BootstrapError> {
        if !self.session().is_logged_in() {
            return Ok(Snapshot::default());
        }

        let (employees, departments, pay_groups, pay_items, attendance, runs, stats, work_types, leave, me) = tokio::join!(
            self.list_employees(),
            self.list_departments(),
            self.list_pay_groups(),
            self.list_pay_items(),
            self.monthly_attendance(year_month),
            self.pay_runs_with_latest_results(),
            self.dashboard_stats(),
            self.list_work_types(),
            self.list_leave_requests(),
            self.current_user(),
        );

        let mut snapshot = Snapshot::default();
        let mut failures = Vec::new();
        let mut keep = |resource: Resource, result: Result<()>| {
            if let Err(e) = result {
                warn!("Loading {} failed: {e}", resource.label());
                failures.push((resource, e));
            }
        };

        keep(Resource::Employees, employees.map(|v| snapshot.employees = v));
        keep(Resource::Departments, departments.map(|v| snapshot.departments = v));
        keep(Resource::PayGroups, pay_groups.map(|v| snapshot.pay_groups = v));
        keep(Resource::PayItems, pay_items.map(|v| snapshot.pay_items = v));
        keep(Resource::Attendance, attendance.map(|v| snapshot.attendance = v));
        let (runs, latest) = runs;
        keep(Resource::PayRuns, runs.map(|v| snapshot.pay_runs = v));
        if let Some((run_id, results)) = latest {
            snapshot.selected_run = Some(run_id);
            keep(Resource::PayResults, results.map(|v| snapshot.pay_results = v));
        }
        keep(Resource::DashboardStats, stats.map(|v| snapshot.stats = Some(v)));
        keep(Resource::WorkTypes, work_types.map(|v| snapshot.work_types = v));
        keep(Resource::LeaveRequests, leave.map(|v| snapshot.leave_requests = v));

        // Profile is optional: the view works without it.
        snapshot.current_user = me
            .inspect_err(|e| debug!("Current user unavailable: {e}"))
            .ok();

        if failures.is_empty() {
            Ok(snapshot)
        } else {
            Err(BootstrapError { failures, partial: snapshot })
        }
    }

    /// Pay runs, then the results of the newest one. The two outcomes are
    /// kept apart so a failed results fetch leaves the run list intact.
    async fn pay_runs_with_latest_results(
        &self,
    ) -> (Result<Vec<PayRun>>, Option<(i64, Result<Vec<PayResult>>)>) {
        let runs = match self.list_pay_runs().await {
            Ok(runs) => runs,
            Err(e) => return (Err(e), None),
        };
        let Some(latest) = runs.first().map(|r| r.id) else {
            return (Ok(runs), None);
        };
        let results = self.pay_results(latest).await;
        (Ok(runs), Some((latest, results)))
    }

    /// User accounts, fetched only for the administrator. Any failure leaves
    /// the list empty.
    pub async fn list_users_if_admin(&self, current: Option<&User>) -> Vec<User> {
        if !current.is_some_and(User::is_admin) {
            return Vec::new();
        }
        self.list_users().await.unwrap_or_else(|e| {
            warn!("Loading users failed: {e}");
            Vec::new()
        })
    }
}
