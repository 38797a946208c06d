use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Work category a session is logged under. The set is closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PomodoroType {
    Product,
    #[serde(rename = "Customer/Partner/Community")]
    CustomerPartnerCommunity,
    Content,
    Team,
    #[serde(rename = "Social Media")]
    SocialMedia,
    Unqueued,
    Queued,
    #[serde(rename = "Learn/Train")]
    LearnTrain,
    Travel,
    #[serde(rename = "PTO")]
    Pto,
}

impl PomodoroType {
    /// All categories in display order.
    pub const ALL: [PomodoroType; 10] = [
        PomodoroType::Product,
        PomodoroType::CustomerPartnerCommunity,
        PomodoroType::Content,
        PomodoroType::Team,
        PomodoroType::SocialMedia,
        PomodoroType::Unqueued,
        PomodoroType::Queued,
        PomodoroType::LearnTrain,
        PomodoroType::Travel,
        PomodoroType::Pto,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PomodoroType::Product => "Product",
            PomodoroType::CustomerPartnerCommunity => "Customer/Partner/Community",
            PomodoroType::Content => "Content",
            PomodoroType::Team => "Team",
            PomodoroType::SocialMedia => "Social Media",
            PomodoroType::Unqueued => "Unqueued",
            PomodoroType::Queued => "Queued",
            PomodoroType::LearnTrain => "Learn/Train",
            PomodoroType::Travel => "Travel",
            PomodoroType::Pto => "PTO",
        }
    }

    /// Hex color used when rendering this category.
    pub fn color(&self) -> &'static str {
        match self {
            PomodoroType::Product => "#e94560",
            PomodoroType::CustomerPartnerCommunity => "#4ecca3",
            PomodoroType::Content => "#ffc93c",
            PomodoroType::Team => "#a855f7",
            PomodoroType::SocialMedia => "#3b82f6",
            PomodoroType::Unqueued => "#6b7280",
            PomodoroType::Queued => "#8b5cf6",
            PomodoroType::LearnTrain => "#10b981",
            PomodoroType::Travel => "#f97316",
            PomodoroType::Pto => "#06b6d4",
        }
    }
}

impl fmt::Display for PomodoroType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PomodoroType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PomodoroType::ALL
            .iter()
            .copied()
            .find(|t| t.label() == s)
            .ok_or_else(|| format!("Unknown pomodoro type: {}", s))
    }
}

/// One logged unit of work, as stored by the backend.
///
/// `duration_minutes` is expected to match the timestamp span but the
/// backend owns that rule; nothing here enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pomodoro {
    pub id: String,
    pub name: String,
    pub pomodoro_type: PomodoroType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Pomodoro {
    /// Whole minutes between start and end, clamped at zero.
    pub fn span_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes().max(0)
    }
}

/// Parameters for logging a session after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEntry {
    pub name: String,
    pub pomodoro_type: PomodoroType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub notes: Option<String>,
}
