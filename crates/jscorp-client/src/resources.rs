//! Typed HR endpoints. All of them go through the authorized request path.

use jscorp_common::models::*;

use crate::error::Result;
use crate::gateway::Gateway;

impl Gateway {
    // ── Account ───────────────────────────────────────────────────────────────

    pub async fn current_user(&self) -> Result<User> {
        self.get("/api/auth/me").await
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<()> {
        let body = ChangePasswordRequest {
            current_password: current_password.to_owned(),
            new_password: new_password.to_owned(),
        };
        let _: serde_json::Value = self.post("/api/auth/change-password", &body).await?;
        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get("/api/users").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        self.post("/api/users", user).await
    }

    pub async fn set_user_password(&self, user_id: i64, new_password: &str) -> Result<()> {
        let body = SetPasswordRequest { new_password: new_password.to_owned() };
        let _: serde_json::Value = self.patch(&format!("/api/users/{user_id}/password"), &body).await?;
        Ok(())
    }

    // ── Employees ─────────────────────────────────────────────────────────────

    pub async fn list_employees(&self) -> Result<Vec<Employee>> {
        self.get("/api/employees").await
    }

    pub async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee> {
        self.post("/api/employees", employee).await
    }

    pub async fn update_employee(&self, id: i64, fields: &EmployeeUpdate) -> Result<Employee> {
        self.patch(&format!("/api/employees/{id}"), fields).await
    }

    pub async fn delete_employee(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/employees/{id}")).await
    }

    // ── Departments ───────────────────────────────────────────────────────────

    pub async fn list_departments(&self) -> Result<Vec<Department>> {
        self.get("/api/departments").await
    }

    pub async fn create_department(&self, department: &NewDepartment) -> Result<Department> {
        self.post("/api/departments", department).await
    }

    pub async fn update_department(&self, id: i64, fields: &DepartmentUpdate) -> Result<Department> {
        self.patch(&format!("/api/departments/{id}"), fields).await
    }

    pub async fn delete_department(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/departments/{id}")).await
    }

    // ── Pay groups ────────────────────────────────────────────────────────────

    pub async fn list_pay_groups(&self) -> Result<Vec<PayGroup>> {
        self.get("/api/payroll/pay-groups").await
    }

    pub async fn create_pay_group(&self, group: &NewPayGroup) -> Result<PayGroup> {
        self.post("/api/payroll/pay-groups", group).await
    }

    pub async fn update_pay_group(&self, id: i64, fields: &PayGroupUpdate) -> Result<PayGroup> {
        self.patch(&format!("/api/payroll/pay-groups/{id}"), fields).await
    }

    pub async fn delete_pay_group(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/payroll/pay-groups/{id}")).await
    }

    // ── Pay items ─────────────────────────────────────────────────────────────

    pub async fn list_pay_items(&self) -> Result<Vec<PayItem>> {
        self.get("/api/payroll/pay-items").await
    }

    pub async fn create_pay_item(&self, item: &NewPayItem) -> Result<PayItem> {
        self.post("/api/payroll/pay-items", item).await
    }

    pub async fn update_pay_item(&self, id: i64, fields: &PayItemUpdate) -> Result<PayItem> {
        self.patch(&format!("/api/payroll/pay-items/{id}"), fields).await
    }

    pub async fn delete_pay_item(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/payroll/pay-items/{id}")).await
    }

    // ── Pay runs ──────────────────────────────────────────────────────────────

    /// Newest first, as ordered by the backend.
    pub async fn list_pay_runs(&self) -> Result<Vec<PayRun>> {
        self.get("/api/payroll/runs").await
    }

    pub async fn create_pay_run(&self, run: &NewPayRun) -> Result<PayRun> {
        self.post("/api/payroll/runs", run).await
    }

    pub async fn pay_results(&self, run_id: i64) -> Result<Vec<PayResult>> {
        self.get(&format!("/api/payroll/runs/{run_id}/results")).await
    }

    // ── Attendance ────────────────────────────────────────────────────────────

    /// Summaries for `year_month` (`YYYYMM`).
    pub async fn monthly_attendance(&self, year_month: &str) -> Result<Vec<AttendanceSummary>> {
        self.get(&format!("/api/attendance/monthly?year_month={year_month}")).await
    }

    pub async fn list_work_types(&self) -> Result<Vec<WorkType>> {
        self.get("/api/attendance/work-types").await
    }

    pub async fn create_work_type(&self, work_type: &NewWorkType) -> Result<WorkType> {
        self.post("/api/attendance/work-types", work_type).await
    }

    pub async fn update_work_type(&self, id: i64, fields: &WorkTypeUpdate) -> Result<WorkType> {
        self.patch(&format!("/api/attendance/work-types/{id}"), fields).await
    }

    pub async fn delete_work_type(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/attendance/work-types/{id}")).await
    }

    pub async fn list_leave_requests(&self) -> Result<Vec<LeaveRequest>> {
        self.get("/api/attendance/leave-requests").await
    }

    pub async fn create_leave_request(&self, request: &NewLeaveRequest) -> Result<LeaveRequest> {
        self.post("/api/attendance/leave-requests", request).await
    }

    // ── Dashboard ─────────────────────────────────────────────────────────────

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get("/api/dashboard/stats").await
    }
}
