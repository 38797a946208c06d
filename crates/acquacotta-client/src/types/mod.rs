//! Value types shared with the backend.
//!
//! These mirror the backend's wire format exactly; none of them carry
//! behavior beyond small read-only helpers.

mod pomodoro;
mod report;
mod settings;
mod timer;

pub use pomodoro::{ManualEntry, Pomodoro, PomodoroType};
pub use report::{DailyTotal, ReportData, ReportPeriod};
pub use settings::Settings;
pub use timer::{TimerState, TimerStatus};
