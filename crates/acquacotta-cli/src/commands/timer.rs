use std::io::{self, Write};
use std::time::Duration;

use acquacotta_client::{ClientConfig, ClientContext, TimerPresentation, TimerState};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a work phase
    Start,
    /// Pause the running phase
    Pause,
    /// Resume a paused phase
    Resume,
    /// Stop and return to idle
    Stop,
    /// End the current break early
    SkipBreak,
    /// Print current timer state as JSON
    Status,
    /// Follow the countdown until the phase ends or Ctrl-C
    Watch {
        /// Seconds between reconciliations with the backend
        #[arg(long, default_value = "30")]
        sync_every: u64,
    },
}

pub async fn run(
    action: TimerAction,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = ClientContext::from_config(config)?;
    // Phase lengths are derived from settings.
    ctx.settings.load().await;

    match action {
        TimerAction::Start => ctx.timer.start().await?,
        TimerAction::Pause => ctx.timer.pause().await?,
        TimerAction::Resume => ctx.timer.resume().await?,
        TimerAction::Stop => ctx.timer.stop().await?,
        TimerAction::SkipBreak => ctx.timer.skip_break().await?,
        TimerAction::Status => {
            let status = ctx.commands.get_timer_status().await?;
            ctx.timer.apply_status(&status);
        }
        TimerAction::Watch { sync_every } => return watch(&ctx, sync_every).await,
    }

    print_status(&ctx.timer.current())?;
    Ok(())
}

fn print_status(timer: &TimerPresentation) -> Result<(), serde_json::Error> {
    let mut json = serde_json::to_value(timer)?;
    json["formatted_time"] = timer.formatted_time().into();
    json["progress"] = timer.progress().into();
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn render(timer: &TimerPresentation) -> io::Result<()> {
    let phase = if timer.is_break { "break" } else { "work" };
    let mut out = io::stdout().lock();
    write!(
        out,
        "\r{}  {:>3.0}%  {:<7} {phase:<5}",
        timer.formatted_time(),
        timer.progress(),
        timer.state.as_str(),
    )?;
    out.flush()
}

fn is_active(state: TimerState) -> bool {
    matches!(state, TimerState::Running | TimerState::Break)
}

async fn watch(ctx: &ClientContext, sync_every: u64) -> Result<(), Box<dyn std::error::Error>> {
    let status = ctx.commands.get_timer_status().await?;
    ctx.timer.apply_status(&status);

    let mut rx = ctx.timer.subscribe();
    let current = rx.borrow_and_update().clone();
    render(&current)?;
    if !is_active(current.state) {
        println!();
        return Ok(());
    }

    let mut resync = tokio::time::interval(Duration::from_secs(sync_every.max(1)));
    // The first tick fires immediately.
    resync.tick().await;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = rx.borrow_and_update().clone();
                render(&current)?;
                if !is_active(current.state) {
                    break;
                }
            }
            _ = resync.tick() => ctx.timer.sync().await,
            _ = &mut ctrl_c => break,
        }
    }
    println!();
    Ok(())
}
