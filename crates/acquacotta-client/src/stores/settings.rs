use std::sync::Arc;

use tokio::sync::watch;

use crate::api::Commands;
use crate::error::GatewayError;
use crate::store::Observable;
use crate::types::Settings;

/// Holds the settings snapshot the rest of the client reads from.
///
/// Cloning yields another handle to the same snapshot.
#[derive(Clone)]
pub struct SettingsStore {
    commands: Commands,
    settings: Arc<Observable<Settings>>,
}

impl SettingsStore {
    pub fn new(commands: Commands) -> Self {
        Self {
            commands,
            settings: Arc::new(Observable::new(Settings::default())),
        }
    }

    pub fn current(&self) -> Arc<Settings> {
        self.settings.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Settings>> {
        self.settings.subscribe()
    }

    /// Fetch settings from the backend.
    ///
    /// Never fails: if the backend is unreachable or answers badly the
    /// built-in defaults are installed so the timer can still render.
    pub async fn load(&self) {
        match self.commands.get_settings().await {
            Ok(loaded) => self.settings.set(loaded),
            Err(e) => {
                tracing::warn!(error = %e, "could not load settings, using defaults");
                self.settings.set(Settings::default());
            }
        }
    }

    /// Persist `new_settings`, then adopt them locally.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error; the held snapshot is left as it was.
    pub async fn update(&self, new_settings: Settings) -> Result<(), GatewayError> {
        self.commands.save_settings(&new_settings).await?;
        self.settings.set(new_settings);
        Ok(())
    }
}
