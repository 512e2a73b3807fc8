use std::{fmt, fs, path::Path, str::FromStr};

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// A calendar step used both for the gap between due dates and for the delay before the
/// first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Days(u32),
    Weeks(u32),
    Months(u32),
}

impl Interval {
    pub fn is_zero(&self) -> bool {
        matches!(
            self,
            Interval::Days(0) | Interval::Weeks(0) | Interval::Months(0)
        )
    }

    /// `from` moved forward by `times` steps. Month steps are taken from `from` in one go,
    /// so a schedule anchored on the 31st lands on each month's last day without drifting.
    pub fn advance(&self, from: NaiveDate, times: u32) -> Result<NaiveDate> {
        let moved = match *self {
            Interval::Days(n) => from.checked_add_days(Days::new(u64::from(n) * u64::from(times))),
            Interval::Weeks(n) => {
                from.checked_add_days(Days::new(7 * u64::from(n) * u64::from(times)))
            }
            Interval::Months(n) => n
                .checked_mul(times)
                .and_then(|months| from.checked_add_months(Months::new(months))),
        };
        moved.ok_or(LedgerError::DateOutOfRange(from))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Days(n) => write!(f, "days:{}", n),
            Interval::Weeks(n) => write!(f, "weeks:{}", n),
            Interval::Months(n) => write!(f, "months:{}", n),
        }
    }
}

impl FromStr for Interval {
    type Err = LedgerError;

    /// Accepts `daily`, `weekly`, `monthly` or `<unit>:<n>` with unit one of days, weeks,
    /// months.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "daily" => return Ok(Interval::Days(1)),
            "weekly" => return Ok(Interval::Weeks(1)),
            "monthly" => return Ok(Interval::Months(1)),
            _ => {}
        }
        let invalid = || LedgerError::InvalidInput(format!("unrecognised interval {:?}", s));
        let (unit, n) = s.split_once(':').ok_or_else(invalid)?;
        let n: u32 = n.trim().parse().map_err(|_| invalid())?;
        match unit.trim() {
            "days" => Ok(Interval::Days(n)),
            "weeks" => Ok(Interval::Weeks(n)),
            "months" => Ok(Interval::Months(n)),
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Number of installments a purchase is split into.
    pub count: u32,
    pub cadence: Interval,
    pub first_due_offset: Interval,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            count: 3,
            cadence: Interval::Months(1),
            first_due_offset: Interval::Months(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub weekly_window_days: u32,
    pub monthly_window_days: u32,
    pub trend_months: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            weekly_window_days: 7,
            monthly_window_days: 30,
            trend_months: 6,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub schedule: ScheduleConfig,
    pub reports: ReportConfig,
}

impl LedgerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
