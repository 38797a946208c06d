//! # Acquacotta Client Library
//!
//! Client-side state and command bindings for the Acquacotta Pomodoro
//! timer. The timer state machine, session storage and report computation
//! live in a backend process; this crate calls it through a single
//! request/response [`Gateway`] and mirrors the results into observable
//! stores a UI can subscribe to.
//!
//! ## Key Components
//!
//! - [`Gateway`]: the call boundary ([`HttpGateway`], [`ScriptedGateway`])
//! - [`Commands`]: one typed method per backend operation
//! - [`SettingsStore`], [`SessionStore`]: fail-soft mirrors of backend data
//! - [`TimerStore`]: backend snapshots plus a local one-second countdown
//! - [`ClientContext`]: all of the above wired to one gateway

pub mod api;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod gateway;
pub mod report;
pub mod store;
pub mod stores;
pub mod types;

pub use api::Commands;
pub use config::ClientConfig;
pub use context::ClientContext;
pub use error::{ClientError, ConfigError, GatewayError};
pub use gateway::{Gateway, HttpGateway, ScriptedGateway};
pub use report::ReportQuery;
pub use store::Observable;
pub use stores::{SessionStore, SettingsStore, TimerPresentation, TimerStore};
pub use types::{
    DailyTotal, ManualEntry, Pomodoro, PomodoroType, ReportData, ReportPeriod, Settings,
    TimerState, TimerStatus,
};
