//! One application's worth of stores, wired to a single gateway.

use std::sync::Arc;

use crate::api::Commands;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::gateway::{Gateway, HttpGateway};
use crate::report::ReportQuery;
use crate::stores::{SessionStore, SettingsStore, TimerStore};

#[derive(Clone)]
pub struct ClientContext {
    pub commands: Commands,
    pub settings: SettingsStore,
    pub sessions: SessionStore,
    pub timer: TimerStore,
    pub reports: ReportQuery,
}

impl ClientContext {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let commands = Commands::new(gateway);
        let settings = SettingsStore::new(commands.clone());
        Self {
            sessions: SessionStore::new(commands.clone()),
            timer: TimerStore::new(commands.clone(), settings.clone()),
            reports: ReportQuery::new(commands.clone()),
            settings,
            commands,
        }
    }

    /// Context talking HTTP to the backend named in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let gateway = HttpGateway::new(&config.gateway.base_url)?;
        Ok(Self::new(Arc::new(gateway)))
    }

    /// Startup sequence: settings first, since the timer's phase lengths
    /// are derived from them, then the current timer status.
    pub async fn bootstrap(&self) {
        self.settings.load().await;
        self.timer.sync().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ScriptedGateway;
    use crate::types::TimerState;
    use serde_json::json;

    #[tokio::test]
    async fn bootstrap_loads_settings_before_syncing_timer() {
        let gw = Arc::new(ScriptedGateway::new());
        gw.respond(
            "get_settings",
            json!({
                "work_duration_minutes": 45, "short_break_minutes": 15,
                "long_break_minutes": 30, "pomodoros_until_long_break": 2,
                "sound_enabled": true, "notifications_enabled": false
            }),
        )
        .respond(
            "get_timer_status",
            json!({
                "state": "paused",
                "remaining_seconds": 600,
                "is_break": false,
                "completed_count": 1
            }),
        );
        let ctx = ClientContext::new(gw.clone());

        ctx.bootstrap().await;

        let t = ctx.timer.current();
        assert_eq!(t.state, TimerState::Paused);
        assert_eq!(t.total_seconds, 45 * 60);
        let order: Vec<_> = gw.calls().into_iter().map(|c| c.command).collect();
        assert_eq!(order, vec!["get_settings", "get_timer_status"]);
    }

    #[test]
    fn from_config_rejects_bad_url() {
        let mut config = ClientConfig::default();
        config.gateway.base_url = "::nope::".into();
        assert!(ClientContext::from_config(&config).is_err());
    }
}
