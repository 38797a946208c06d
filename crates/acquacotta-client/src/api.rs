//! Typed bindings for every backend operation.
//!
//! Parameter names are the backend's (camelCase) names; optional parameters
//! are left out of the argument object when absent.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::types::{
    ManualEntry, Pomodoro, PomodoroType, ReportData, ReportPeriod, Settings, TimerStatus,
};

/// Backend date format for range and anchor parameters.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct Commands {
    gateway: Arc<dyn Gateway>,
}

impl Commands {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        command: &str,
        args: Option<Value>,
    ) -> Result<T, GatewayError> {
        tracing::debug!(command, "backend call");
        let raw = self.gateway.invoke(command, args).await?;
        serde_json::from_value(raw).map_err(|e| GatewayError::decode(command, e.to_string()))
    }

    /// For operations whose result is ignored.
    async fn call_unit(&self, command: &str, args: Option<Value>) -> Result<(), GatewayError> {
        tracing::debug!(command, "backend call");
        self.gateway.invoke(command, args).await.map(|_| ())
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub async fn start_timer(&self) -> Result<TimerStatus, GatewayError> {
        self.call("start_timer", None).await
    }

    pub async fn pause_timer(&self) -> Result<TimerStatus, GatewayError> {
        self.call("pause_timer", None).await
    }

    pub async fn resume_timer(&self) -> Result<TimerStatus, GatewayError> {
        self.call("resume_timer", None).await
    }

    pub async fn stop_timer(&self) -> Result<TimerStatus, GatewayError> {
        self.call("stop_timer", None).await
    }

    pub async fn skip_break(&self) -> Result<TimerStatus, GatewayError> {
        self.call("skip_break", None).await
    }

    pub async fn get_timer_status(&self) -> Result<TimerStatus, GatewayError> {
        self.call("get_timer_status", None).await
    }

    // ── Sessions ─────────────────────────────────────────────────────

    pub async fn save_pomodoro(
        &self,
        name: &str,
        pomodoro_type: PomodoroType,
        duration_minutes: u32,
        notes: Option<&str>,
    ) -> Result<Pomodoro, GatewayError> {
        let mut args = Map::new();
        args.insert("name".into(), json!(name));
        args.insert("pomodoroType".into(), json!(pomodoro_type));
        args.insert("durationMinutes".into(), json!(duration_minutes));
        insert_opt(&mut args, "notes", notes);
        self.call("save_pomodoro", Some(Value::Object(args))).await
    }

    pub async fn get_pomodoros(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Pomodoro>, GatewayError> {
        let mut args = Map::new();
        insert_opt(&mut args, "startDate", start_date.map(format_date));
        insert_opt(&mut args, "endDate", end_date.map(format_date));
        self.call("get_pomodoros", Some(Value::Object(args))).await
    }

    pub async fn update_pomodoro(&self, pomodoro: &Pomodoro) -> Result<Pomodoro, GatewayError> {
        self.call("update_pomodoro", Some(json!({ "pomodoro": pomodoro })))
            .await
    }

    pub async fn delete_pomodoro(&self, id: &str) -> Result<(), GatewayError> {
        self.call_unit("delete_pomodoro", Some(json!({ "id": id })))
            .await
    }

    pub async fn add_manual_pomodoro(&self, entry: &ManualEntry) -> Result<Pomodoro, GatewayError> {
        let mut args = Map::new();
        args.insert("name".into(), json!(entry.name));
        args.insert("pomodoroType".into(), json!(entry.pomodoro_type));
        args.insert("startTime".into(), json!(entry.start_time.to_rfc3339()));
        args.insert("endTime".into(), json!(entry.end_time.to_rfc3339()));
        args.insert("durationMinutes".into(), json!(entry.duration_minutes));
        insert_opt(&mut args, "notes", entry.notes.as_deref());
        self.call("add_manual_pomodoro", Some(Value::Object(args)))
            .await
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub async fn get_settings(&self) -> Result<Settings, GatewayError> {
        self.call("get_settings", None).await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), GatewayError> {
        self.call_unit("save_settings", Some(json!({ "settings": settings })))
            .await
    }

    // ── Export / reports ─────────────────────────────────────────────

    /// Ask the backend to write a CSV export; returns the written path.
    pub async fn export_pomodoros(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        export_path: Option<&str>,
    ) -> Result<String, GatewayError> {
        let mut args = Map::new();
        insert_opt(&mut args, "startDate", start_date.map(format_date));
        insert_opt(&mut args, "endDate", end_date.map(format_date));
        insert_opt(&mut args, "exportPath", export_path);
        self.call("export_pomodoros", Some(Value::Object(args)))
            .await
    }

    pub async fn get_report_data(
        &self,
        period: ReportPeriod,
        date: NaiveDate,
    ) -> Result<ReportData, GatewayError> {
        self.call(
            "get_report_data",
            Some(json!({ "period": period, "date": format_date(date) })),
        )
        .await
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn insert_opt<T: Into<Value>>(args: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        args.insert(key.to_string(), v.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ScriptedGateway;
    use crate::types::TimerState;
    use chrono::{TimeZone, Utc};

    fn setup() -> (Arc<ScriptedGateway>, Commands) {
        let gw = Arc::new(ScriptedGateway::new());
        let commands = Commands::new(gw.clone());
        (gw, commands)
    }

    #[tokio::test]
    async fn timer_commands_take_no_args() {
        let (gw, commands) = setup();
        gw.respond(
            "pause_timer",
            json!({
                "state": "paused",
                "remaining_seconds": 61,
                "is_break": false,
                "completed_count": 1
            }),
        );

        let status = commands.pause_timer().await.unwrap();

        assert_eq!(status.state, TimerState::Paused);
        assert_eq!(gw.calls_to("pause_timer"), vec![None]);
    }

    #[tokio::test]
    async fn get_pomodoros_omits_missing_bounds() {
        let (gw, commands) = setup();
        gw.respond("get_pomodoros", json!([]));

        commands.get_pomodoros(None, None).await.unwrap();
        commands
            .get_pomodoros(NaiveDate::from_ymd_opt(2024, 3, 1), None)
            .await
            .unwrap();

        assert_eq!(
            gw.calls_to("get_pomodoros"),
            vec![Some(json!({})), Some(json!({"startDate": "2024-03-01"}))]
        );
    }

    #[tokio::test]
    async fn save_pomodoro_uses_camel_case_keys() {
        let (gw, commands) = setup();
        gw.respond(
            "save_pomodoro",
            json!({
                "id": "p1", "name": "Review", "pomodoro_type": "Team",
                "start_time": "2024-03-01T09:00:00Z", "end_time": "2024-03-01T09:25:00Z",
                "duration_minutes": 25
            }),
        );

        let saved = commands
            .save_pomodoro("Review", PomodoroType::Team, 25, None)
            .await
            .unwrap();

        assert_eq!(saved.id, "p1");
        assert_eq!(
            gw.calls_to("save_pomodoro"),
            vec![Some(json!({"name": "Review", "pomodoroType": "Team", "durationMinutes": 25}))]
        );
    }

    #[tokio::test]
    async fn add_manual_sends_rfc3339_timestamps() {
        let (gw, commands) = setup();
        gw.reject("add_manual_pomodoro", "storage full");
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let entry = ManualEntry {
            name: "Flight".into(),
            pomodoro_type: PomodoroType::Travel,
            start_time: start,
            end_time: start + chrono::Duration::minutes(90),
            duration_minutes: 90,
            notes: Some("LIS-AMS".into()),
        };

        let err = commands.add_manual_pomodoro(&entry).await.unwrap_err();

        assert!(matches!(err, GatewayError::Rejected { .. }));
        let args = gw.calls_to("add_manual_pomodoro")[0].clone().unwrap();
        assert_eq!(args["startTime"], "2024-03-01T09:00:00+00:00");
        assert_eq!(args["pomodoroType"], "Travel");
        assert_eq!(args["notes"], "LIS-AMS");
    }

    #[tokio::test]
    async fn wrong_result_shape_is_a_decode_error() {
        let (gw, commands) = setup();
        gw.respond("get_settings", json!({"work_duration_minutes": "lots"}));

        let err = commands.get_settings().await.unwrap_err();

        assert_eq!(err.command(), "get_settings");
        assert!(matches!(err, GatewayError::Decode { .. }));
    }

    #[tokio::test]
    async fn report_and_export_arguments() {
        let (gw, commands) = setup();
        gw.respond("export_pomodoros", json!("/tmp/export.csv"));
        gw.respond(
            "get_report_data",
            json!({
                "period": "week",
                "total_minutes": 0,
                "total_pomodoros": 0,
                "by_type": {},
                "daily_totals": []
            }),
        );
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        let path = commands
            .export_pomodoros(None, Some(day), Some("/tmp/export.csv"))
            .await
            .unwrap();
        commands.get_report_data(ReportPeriod::Week, day).await.unwrap();

        assert_eq!(path, "/tmp/export.csv");
        assert_eq!(
            gw.calls_to("export_pomodoros"),
            vec![Some(json!({"endDate": "2024-03-04", "exportPath": "/tmp/export.csv"}))]
        );
        assert_eq!(
            gw.calls_to("get_report_data"),
            vec![Some(json!({"period": "week", "date": "2024-03-04"}))]
        );
    }
}
