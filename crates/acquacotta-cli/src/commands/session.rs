use acquacotta_client::{ClientConfig, ClientContext, ManualEntry, Pomodoro, PomodoroType};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum SessionAction {
    /// List recorded sessions, newest first
    List {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a session that just finished
    Add {
        /// What was worked on
        name: String,
        /// Category label (see `acquacotta categories`)
        #[arg(long = "type", default_value = "Product")]
        pomodoro_type: PomodoroType,
        /// Length in minutes
        #[arg(long, default_value = "25")]
        duration: u32,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Record a past session with explicit times
    AddManual {
        name: String,
        #[arg(long = "type", default_value = "Product")]
        pomodoro_type: PomodoroType,
        /// Start time, RFC 3339
        #[arg(long)]
        start: DateTime<Utc>,
        /// End time, RFC 3339
        #[arg(long)]
        end: DateTime<Utc>,
        /// Length in minutes (defaults to the time span)
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change fields of a recorded session
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        pomodoro_type: Option<PomodoroType>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a recorded session
    Delete { id: String },
}

/// Logged duration, with the timestamp span appended when the two disagree.
fn duration_cell(p: &Pomodoro) -> String {
    let span = p.span_minutes();
    if span == i64::from(p.duration_minutes) {
        format!("{}m", p.duration_minutes)
    } else {
        format!("{}m ({span}m span)", p.duration_minutes)
    }
}

fn print_table(sessions: &[Pomodoro], total_minutes: u32) {
    for p in sessions {
        println!(
            "{}  {}  {:>5}  {:<26}  {}",
            p.start_time.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            p.id,
            duration_cell(p),
            p.pomodoro_type.label(),
            p.name,
        );
    }
    println!("{} sessions, {} minutes", sessions.len(), total_minutes);
}

pub async fn run(
    action: SessionAction,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = ClientContext::from_config(config)?;

    match action {
        SessionAction::List { from, to, json } => {
            ctx.sessions.refresh(from, to).await?;
            let sessions = ctx.sessions.current();
            if json {
                println!("{}", serde_json::to_string_pretty(&*sessions)?);
            } else {
                print_table(&sessions, ctx.sessions.total_minutes());
            }
        }
        SessionAction::Add {
            name,
            pomodoro_type,
            duration,
            notes,
        } => {
            let saved = ctx
                .sessions
                .save(&name, pomodoro_type, duration, notes.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
        SessionAction::AddManual {
            name,
            pomodoro_type,
            start,
            end,
            duration,
            notes,
        } => {
            if end <= start {
                return Err("end must be after start".into());
            }
            let duration_minutes = match duration {
                Some(minutes) => minutes,
                None => u32::try_from((end - start).num_minutes())?,
            };
            let entry = ManualEntry {
                name,
                pomodoro_type,
                start_time: start,
                end_time: end,
                duration_minutes,
                notes,
            };
            let saved = ctx.sessions.add_manual(&entry).await?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
        SessionAction::Edit {
            id,
            name,
            pomodoro_type,
            duration,
            notes,
        } => {
            ctx.sessions.refresh(None, None).await?;
            let mut record = ctx
                .sessions
                .current()
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or_else(|| format!("no session with id {id}"))?;
            if let Some(name) = name {
                record.name = name;
            }
            if let Some(pomodoro_type) = pomodoro_type {
                record.pomodoro_type = pomodoro_type;
            }
            if let Some(duration) = duration {
                record.duration_minutes = duration;
            }
            if notes.is_some() {
                record.notes = notes;
            }
            let updated = ctx.sessions.edit(&record).await?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        SessionAction::Delete { id } => {
            ctx.sessions.remove(&id).await?;
            println!("deleted {id}");
        }
    }
    Ok(())
}
