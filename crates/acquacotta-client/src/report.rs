//! Report queries. Stateless: every call goes to the backend.

use chrono::NaiveDate;

use crate::api::Commands;
use crate::error::GatewayError;
use crate::types::{ReportData, ReportPeriod};

#[derive(Clone)]
pub struct ReportQuery {
    commands: Commands,
}

impl ReportQuery {
    pub fn new(commands: Commands) -> Self {
        Self { commands }
    }

    /// Aggregate for the day, week or month containing `date`.
    pub async fn fetch(
        &self,
        period: ReportPeriod,
        date: NaiveDate,
    ) -> Result<ReportData, GatewayError> {
        self.commands.get_report_data(period, date).await
    }
}
