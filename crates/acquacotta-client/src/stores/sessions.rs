use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::api::Commands;
use crate::error::GatewayError;
use crate::store::Observable;
use crate::types::{ManualEntry, Pomodoro, PomodoroType};

/// Local mirror of the backend's session list, newest first.
///
/// The list is never authoritative: every mutation is applied only after
/// the backend confirmed it, using the record the backend returned.
#[derive(Clone)]
pub struct SessionStore {
    commands: Commands,
    sessions: Arc<Observable<Vec<Pomodoro>>>,
}

impl SessionStore {
    pub fn new(commands: Commands) -> Self {
        Self {
            commands,
            sessions: Arc::new(Observable::new(Vec::new())),
        }
    }

    pub fn current(&self) -> Arc<Vec<Pomodoro>> {
        self.sessions.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Pomodoro>>> {
        self.sessions.subscribe()
    }

    /// Fetch sessions, optionally bounded by an inclusive date range.
    ///
    /// Never fails: on any error the list is reset to empty.
    pub async fn load(&self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) {
        if let Err(e) = self.refresh(start_date, end_date).await {
            tracing::warn!(error = %e, "could not load sessions, clearing list");
            self.sessions.set(Vec::new());
        }
    }

    /// Like [`SessionStore::load`], but a failure is returned and the
    /// current list is kept.
    pub async fn refresh(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<(), GatewayError> {
        let loaded = self.commands.get_pomodoros(start_date, end_date).await?;
        self.sessions.set(loaded);
        Ok(())
    }

    /// Delete a session on the backend, then drop it locally.
    pub async fn remove(&self, id: &str) -> Result<(), GatewayError> {
        self.commands.delete_pomodoro(id).await?;
        self.sessions
            .update(|list| list.iter().filter(|p| p.id != id).cloned().collect());
        Ok(())
    }

    /// Replace a session on the backend and swap in the canonical record.
    ///
    /// The record keeps its position in the list. Returns what the backend
    /// stored, which may differ from `updated`.
    pub async fn edit(&self, updated: &Pomodoro) -> Result<Pomodoro, GatewayError> {
        let result = self.commands.update_pomodoro(updated).await?;
        self.sessions.update(|list| {
            list.iter()
                .map(|p| {
                    if p.id == result.id {
                        result.clone()
                    } else {
                        p.clone()
                    }
                })
                .collect()
        });
        Ok(result)
    }

    /// Record a session that just finished on the timer.
    pub async fn save(
        &self,
        name: &str,
        pomodoro_type: PomodoroType,
        duration_minutes: u32,
        notes: Option<&str>,
    ) -> Result<Pomodoro, GatewayError> {
        let saved = self
            .commands
            .save_pomodoro(name, pomodoro_type, duration_minutes, notes)
            .await?;
        self.add_locally(saved.clone());
        Ok(saved)
    }

    /// Record a session after the fact with explicit timestamps.
    pub async fn add_manual(&self, entry: &ManualEntry) -> Result<Pomodoro, GatewayError> {
        let saved = self.commands.add_manual_pomodoro(entry).await?;
        self.add_locally(saved.clone());
        Ok(saved)
    }

    /// Prepend a record the backend already stored. No backend call.
    pub fn add_locally(&self, pomodoro: Pomodoro) {
        self.sessions.update(|list| {
            let mut next = Vec::with_capacity(list.len() + 1);
            next.push(pomodoro);
            next.extend(list.iter().cloned());
            next
        });
    }

    /// Total logged minutes across the loaded list.
    pub fn total_minutes(&self) -> u32 {
        self.sessions.get().iter().map(|p| p.duration_minutes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ScriptedGateway;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn record(id: &str, name: &str) -> Pomodoro {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Pomodoro {
            id: id.into(),
            name: name.into(),
            pomodoro_type: PomodoroType::Product,
            start_time: start,
            end_time: start + chrono::Duration::minutes(25),
            duration_minutes: 25,
            notes: None,
        }
    }

    fn setup(initial: Vec<Pomodoro>) -> (Arc<ScriptedGateway>, SessionStore) {
        let gw = Arc::new(ScriptedGateway::new());
        gw.enqueue("get_pomodoros", serde_json::to_value(&initial).unwrap());
        let store = SessionStore::new(Commands::new(gw.clone()));
        (gw, store)
    }

    #[tokio::test]
    async fn load_failure_clears_list() {
        let (gw, store) = setup(vec![record("a", "A")]);
        store.load(None, None).await;
        assert_eq!(store.current().len(), 1);

        gw.disconnect("get_pomodoros");
        store.load(None, None).await;

        assert!(store.current().is_empty());
    }

    #[tokio::test]
    async fn refresh_failure_keeps_list_and_reports_error() {
        let (gw, store) = setup(vec![record("a", "A"), record("b", "B")]);
        store.refresh(None, None).await.unwrap();
        assert_eq!(store.total_minutes(), 50);

        gw.disconnect("get_pomodoros");
        let err = store.refresh(None, None).await.unwrap_err();

        assert!(matches!(err, GatewayError::Transport { .. }));
        assert_eq!(store.current().len(), 2);
    }

    #[tokio::test]
    async fn remove_filters_after_confirmation() {
        let (gw, store) = setup(vec![record("a", "A"), record("b", "B")]);
        store.load(None, None).await;
        gw.respond("delete_pomodoro", serde_json::Value::Null);

        store.remove("a").await.unwrap();

        let ids: Vec<_> = store.current().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(gw.calls_to("delete_pomodoro"), vec![Some(json!({"id": "a"}))]);
    }

    #[tokio::test]
    async fn edit_swaps_in_server_record_in_place() {
        let (gw, store) = setup(vec![record("a", "A"), record("b", "B"), record("c", "C")]);
        store.load(None, None).await;
        let mut canonical = record("b", "Normalized");
        canonical.notes = Some("trimmed".into());
        gw.respond("update_pomodoro", serde_json::to_value(&canonical).unwrap());

        let returned = store.edit(&record("b", "  Normalized  ")).await.unwrap();

        assert_eq!(returned, canonical);
        let list = store.current();
        assert_eq!(list.len(), 3);
        assert_eq!(list[1], canonical);
        assert_eq!(list[0].name, "A");
        assert_eq!(list[2].name, "C");
    }

    #[tokio::test]
    async fn failed_edit_leaves_list_untouched() {
        let (gw, store) = setup(vec![record("a", "A")]);
        store.load(None, None).await;
        let before = store.current();
        gw.reject("update_pomodoro", "Pomodoro not found");

        assert!(store.edit(&record("a", "X")).await.is_err());

        assert_eq!(*store.current(), *before);
    }

    #[tokio::test]
    async fn save_prepends_backend_record() {
        let (gw, store) = setup(vec![record("a", "A")]);
        store.load(None, None).await;
        gw.respond("save_pomodoro", serde_json::to_value(record("new", "Fresh")).unwrap());

        let saved = store
            .save("Fresh", PomodoroType::Product, 25, None)
            .await
            .unwrap();

        assert_eq!(saved.id, "new");
        assert_eq!(store.current()[0].id, "new");
        assert_eq!(store.current().len(), 2);
        assert_eq!(store.total_minutes(), 50);
    }

    #[tokio::test]
    async fn failed_save_does_not_touch_list() {
        let (gw, store) = setup(vec![]);
        store.load(None, None).await;
        gw.disconnect("save_pomodoro");

        assert!(store.save("x", PomodoroType::Team, 25, None).await.is_err());
        assert!(store.current().is_empty());
    }

    #[test]
    fn add_locally_prepends_without_backend_call() {
        let gw = Arc::new(ScriptedGateway::new());
        let store = SessionStore::new(Commands::new(gw.clone()));

        store.add_locally(record("a", "A"));
        store.add_locally(record("b", "B"));

        assert_eq!(store.current()[0].id, "b");
        assert!(gw.calls().is_empty());
    }
}
