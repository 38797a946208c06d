use acquacotta_client::{ClientConfig, ClientContext, PomodoroType, ReportData, ReportPeriod};
use chrono::{Local, NaiveDate};
use clap::Args;

#[derive(Args)]
pub struct ReportArgs {
    /// day, week or month
    period: ReportPeriod,
    /// Any date inside the period (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Output file; the backend picks one when omitted
    #[arg(long)]
    path: Option<String>,
}

fn print_summary(report: &ReportData, date: NaiveDate) {
    println!("{} report for {date}", report.period);
    println!(
        "  {} pomodoros, {} minutes",
        report.total_pomodoros, report.total_minutes
    );
    for category in PomodoroType::ALL {
        let minutes = report.category_minutes(category);
        if minutes > 0 {
            println!("  {:<26} {:>5}m", category.label(), minutes);
        }
    }
    if let Some(day) = report.busiest_day() {
        println!(
            "  busiest day: {} ({}m over {} sessions)",
            day.date, day.minutes, day.count
        );
    }
}

pub async fn run(
    args: ReportArgs,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = ClientContext::from_config(config)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let report = ctx.reports.fetch(args.period, date).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, date);
    }
    Ok(())
}

pub async fn export(
    args: ExportArgs,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = ClientContext::from_config(config)?;
    let written = ctx
        .commands
        .export_pomodoros(args.from, args.to, args.path.as_deref())
        .await?;
    println!("{written}");
    Ok(())
}
