use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Timer durations and notification preferences.
///
/// Durations are in minutes. The backend validates them; the client takes
/// whatever it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub work_duration_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub pomodoros_until_long_break: u32,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
}

impl Settings {
    /// Saturates at `u32::MAX`; the backend does not bound durations.
    pub fn work_seconds(&self) -> u32 {
        self.work_duration_minutes.saturating_mul(60)
    }

    pub fn short_break_seconds(&self) -> u32 {
        self.short_break_minutes.saturating_mul(60)
    }

    /// Field names accepted by [`Settings::set_field`], in wire order.
    pub const FIELDS: [&'static str; 6] = [
        "work_duration_minutes",
        "short_break_minutes",
        "long_break_minutes",
        "pomodoros_until_long_break",
        "sound_enabled",
        "notifications_enabled",
    ];

    /// Set one field from its textual value.
    ///
    /// Counts must be positive integers and flags `true`/`false`. Other
    /// limits are the backend's business.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        let invalid = |message: String| ClientError::InvalidValue {
            field: field.to_string(),
            message,
        };
        let count = || -> Result<u32> {
            match value.trim().parse::<u32>() {
                Ok(0) => Err(invalid("must be at least 1".into())),
                Ok(n) => Ok(n),
                Err(e) => Err(invalid(e.to_string())),
            }
        };
        let flag = || -> Result<bool> {
            value
                .trim()
                .parse::<bool>()
                .map_err(|e| invalid(e.to_string()))
        };

        match field {
            "work_duration_minutes" => self.work_duration_minutes = count()?,
            "short_break_minutes" => self.short_break_minutes = count()?,
            "long_break_minutes" => self.long_break_minutes = count()?,
            "pomodoros_until_long_break" => self.pomodoros_until_long_break = count()?,
            "sound_enabled" => self.sound_enabled = flag()?,
            "notifications_enabled" => self.notifications_enabled = flag()?,
            _ => return Err(invalid("unknown settings field".into())),
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            pomodoros_until_long_break: 4,
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}
