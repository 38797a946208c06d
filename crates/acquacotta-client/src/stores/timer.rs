//! Timer presentation store.
//!
//! Mirrors the backend's timer and fills the gaps between snapshots with a
//! local one-second countdown.
//!
//! ## Protocol
//!
//! ```text
//! action -> backend snapshot -> reconcile -> arm clock iff running
//! ```
//!
//! The store never moves between idle/running/paused/break on its own; it
//! only decrements `remaining_seconds` while running. When two actions are
//! in flight at once, whichever response lands last overwrites the state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::api::Commands;
use crate::display;
use crate::error::GatewayError;
use crate::store::Observable;
use crate::stores::SettingsStore;
use crate::types::{Settings, TimerState, TimerStatus};

/// Period of the local countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What the UI renders for the timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerPresentation {
    pub state: TimerState,
    pub remaining_seconds: u32,
    pub is_break: bool,
    pub completed_count: u32,
    /// Length of the current phase. Derived from settings when a snapshot
    /// is applied; the backend does not send it.
    pub total_seconds: u32,
}

impl Default for TimerPresentation {
    fn default() -> Self {
        Self::idle(&Settings::default(), 0)
    }
}

impl TimerPresentation {
    /// Full replacement from a backend snapshot.
    ///
    /// Settings are read now, so a settings change only reaches the timer
    /// at the next snapshot.
    pub fn from_status(status: &TimerStatus, settings: &Settings) -> Self {
        let total_seconds = if status.is_break {
            settings.short_break_seconds()
        } else {
            settings.work_seconds()
        };
        Self {
            state: status.state,
            remaining_seconds: status.remaining_seconds,
            is_break: status.is_break,
            completed_count: status.completed_count,
            total_seconds,
        }
    }

    /// Fresh work phase, not started.
    pub fn idle(settings: &Settings, completed_count: u32) -> Self {
        Self {
            state: TimerState::Idle,
            remaining_seconds: settings.work_seconds(),
            is_break: false,
            completed_count,
            total_seconds: settings.work_seconds(),
        }
    }

    /// State after one clock tick, or `None` if the tick changes nothing.
    ///
    /// Only a running timer with time left counts down, by exactly one.
    pub fn tick(&self) -> Option<Self> {
        if self.state != TimerState::Running || self.remaining_seconds == 0 {
            return None;
        }
        Some(Self {
            remaining_seconds: self.remaining_seconds - 1,
            ..self.clone()
        })
    }

    pub fn formatted_time(&self) -> String {
        display::format_time(self.remaining_seconds)
    }

    pub fn progress(&self) -> f64 {
        display::progress_percent(self.total_seconds, self.remaining_seconds)
    }
}

/// The single repeating countdown task.
struct LocalClock {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl LocalClock {
    fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.handle.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_armed(&self) -> bool {
        self.slot().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn arm(&self, presentation: Arc<Observable<TimerPresentation>>) {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no tokio runtime, local countdown not started");
            return;
        };

        tracing::trace!("arming local clock");
        *slot = Some(runtime.spawn(async move {
            let start = time::Instant::now() + TICK_INTERVAL;
            let mut interval = time::interval_at(start, TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                presentation.update_if(TimerPresentation::tick);
            }
        }));
    }

    fn disarm(&self) {
        if let Some(handle) = self.slot().take() {
            tracing::trace!("disarming local clock");
            handle.abort();
        }
    }
}

impl Drop for LocalClock {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Cloning yields another handle to the same state and clock. The clock
/// stops when the last handle is dropped.
#[derive(Clone)]
pub struct TimerStore {
    commands: Commands,
    settings: SettingsStore,
    presentation: Arc<Observable<TimerPresentation>>,
    clock: Arc<LocalClock>,
}

impl TimerStore {
    pub fn new(commands: Commands, settings: SettingsStore) -> Self {
        Self {
            commands,
            settings,
            presentation: Arc::new(Observable::new(TimerPresentation::default())),
            clock: Arc::new(LocalClock::new()),
        }
    }

    pub fn current(&self) -> Arc<TimerPresentation> {
        self.presentation.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<TimerPresentation>> {
        self.presentation.subscribe()
    }

    pub fn formatted_time(&self) -> String {
        self.current().formatted_time()
    }

    pub fn progress(&self) -> f64 {
        self.current().progress()
    }

    pub fn is_armed(&self) -> bool {
        self.clock.is_armed()
    }

    // ── Backend-confirmed actions ────────────────────────────────────

    pub async fn start(&self) -> Result<(), GatewayError> {
        let status = self.commands.start_timer().await?;
        self.apply_status(&status);
        Ok(())
    }

    pub async fn pause(&self) -> Result<(), GatewayError> {
        let status = self.commands.pause_timer().await?;
        self.apply_status(&status);
        Ok(())
    }

    pub async fn resume(&self) -> Result<(), GatewayError> {
        let status = self.commands.resume_timer().await?;
        self.apply_status(&status);
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), GatewayError> {
        let status = self.commands.stop_timer().await?;
        self.apply_status(&status);
        Ok(())
    }

    pub async fn skip_break(&self) -> Result<(), GatewayError> {
        let status = self.commands.skip_break().await?;
        self.apply_status(&status);
        Ok(())
    }

    /// Pull the backend's current status.
    ///
    /// On failure the last known state keeps being displayed.
    pub async fn sync(&self) {
        match self.commands.get_timer_status().await {
            Ok(status) => self.apply_status(&status),
            Err(e) => tracing::debug!(error = %e, "timer sync failed, keeping last state"),
        }
    }

    // ── Local transitions ────────────────────────────────────────────

    /// Reconcile with a snapshot obtained elsewhere (e.g. a pushed event).
    pub fn apply_status(&self, status: &TimerStatus) {
        let settings = self.settings.current();
        self.presentation
            .set(TimerPresentation::from_status(status, &settings));

        if status.state == TimerState::Running {
            self.clock.arm(self.presentation.clone());
        } else {
            self.clock.disarm();
        }
    }

    /// Back to a fresh work phase without asking the backend.
    ///
    /// Keeps the completed count.
    pub fn reset_to_idle(&self) {
        self.clock.disarm();
        let settings = self.settings.current();
        self.presentation
            .update(|t| TimerPresentation::idle(&settings, t.completed_count));
    }
}
