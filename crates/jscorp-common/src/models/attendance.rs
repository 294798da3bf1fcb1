//! Attendance summaries, work types and leave requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Decimal, timestamp};

/// Monthly attendance roll-up for one employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceSummary {
    pub id: i64,
    pub emp_id: i64,
    /// `YYYYMM`.
    pub year_month: String,
    #[serde(default)]
    pub planned_hours: Decimal,
    pub worked_hours: Decimal,
    pub overtime_hours: Decimal,
    #[serde(default)]
    pub night_hours: Decimal,
    #[serde(default)]
    pub holiday_hours: Decimal,
    pub late_count: u32,
    pub early_leave_count: u32,
    pub absence_count: u32,
    #[serde(default)]
    pub is_locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkType {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// `HH:MM`.
    pub start_time: String,
    pub end_time: String,
    pub break_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkType {
    pub code: String,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub break_minutes: u32,
}

impl NewWorkType {
    /// 09:00–18:00 with a one hour break.
    pub fn standard(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            start_time: "09:00".into(),
            end_time: "18:00".into(),
            break_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkTypeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaveRequest {
    pub id: i64,
    pub emp_id: i64,
    /// `ANNUAL`, `SICK`, ...
    pub leave_type: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub start_datetime: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub end_datetime: DateTime<Utc>,
    pub hours: Decimal,
    pub status: String,
    pub reason: Option<String>,
    #[serde(default)]
    pub approver_emp_id: Option<i64>,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    pub fn is_pending(&self) -> bool {
        self.status == "PENDING"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    pub emp_id: i64,
    pub leave_type: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub hours: Decimal,
    pub reason: Option<String>,
}
