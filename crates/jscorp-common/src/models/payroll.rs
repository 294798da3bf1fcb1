//! Pay groups, pay items, pay runs and their results.
//!
//! Pay runs and results are computed by the backend; the client only reads
//! them (and may ask for a new run to be created).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Decimal, timestamp};

// ── Pay groups ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayGroup {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// `MONTHLY`, `BIWEEKLY`, ...
    pub pay_cycle: String,
    pub cutoff_day: u8,
    pub pay_day: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayGroup {
    pub code: String,
    pub name: String,
    pub pay_cycle: String,
    pub cutoff_day: u8,
    pub pay_day: u8,
}

impl NewPayGroup {
    /// Monthly group with the backend's default cutoff (25th) and pay day (10th).
    pub fn monthly(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            pay_cycle: "MONTHLY".into(),
            cutoff_day: 25,
            pay_day: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayGroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_cycle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff_day: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_day: Option<u8>,
}

// ── Pay items ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayItem {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// `EARNING` or `DEDUCTION`.
    pub item_type: String,
    pub taxable: bool,
    /// `FIXED`, `HOURLY`, `FORMULA`, ...
    pub calculation_type: String,
    pub default_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayItem {
    pub code: String,
    pub name: String,
    pub item_type: String,
    pub taxable: bool,
    pub calculation_type: String,
    pub default_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_amount: Option<Decimal>,
}

// ── Pay runs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayRun {
    pub id: i64,
    pub pay_group_id: i64,
    /// `YYYYMM`.
    pub year_month: String,
    pub run_type: String,
    pub status: String,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub calculated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayRun {
    pub pay_group_id: i64,
    pub year_month: String,
    pub run_type: String,
}

/// One employee's computed pay within a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayResult {
    pub id: i64,
    #[serde(default)]
    pub pay_run_id: Option<i64>,
    pub emp_id: i64,
    pub gross_amount: Decimal,
    pub deduct_amount: Decimal,
    pub net_amount: Decimal,
    pub currency: String,
    pub status: String,
}
