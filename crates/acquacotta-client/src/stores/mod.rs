//! Reactive stores mirroring backend state for the UI.
//!
//! Each store is a cheap-to-clone handle around one [`Observable`]
//! snapshot and is its only writer.
//!
//! [`Observable`]: crate::store::Observable

mod sessions;
mod settings;
mod timer;

pub use sessions::SessionStore;
pub use settings::SettingsStore;
pub use timer::{TimerPresentation, TimerStore, TICK_INTERVAL};
