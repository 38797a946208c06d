use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::PomodoroType;

/// Window a report aggregates over, anchored on a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Day,
    Week,
    Month,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Day => "day",
            ReportPeriod::Week => "week",
            ReportPeriod::Month => "month",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(ReportPeriod::Day),
            "week" => Ok(ReportPeriod::Week),
            "month" => Ok(ReportPeriod::Month),
            _ => Err(format!("Invalid period '{}'. Use 'day', 'week', or 'month'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: String,
    pub minutes: u32,
    pub count: u32,
}

/// Aggregate produced by the backend for one period. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportData {
    pub period: String,
    pub total_minutes: u32,
    pub total_pomodoros: u32,
    /// Minutes per category, keyed by category label.
    #[serde(default)]
    pub by_type: BTreeMap<String, u32>,
    #[serde(default)]
    pub daily_totals: Vec<DailyTotal>,
}

impl ReportData {
    pub fn category_minutes(&self, pomodoro_type: PomodoroType) -> u32 {
        self.by_type
            .get(pomodoro_type.label())
            .copied()
            .unwrap_or(0)
    }

    /// Day with the most logged minutes; the earliest one wins a tie.
    pub fn busiest_day(&self) -> Option<&DailyTotal> {
        self.daily_totals
            .iter()
            .filter(|d| d.minutes > 0)
            .fold(None, |best: Option<&DailyTotal>, d| match best {
                Some(b) if b.minutes >= d.minutes => Some(b),
                _ => Some(d),
            })
    }
}
