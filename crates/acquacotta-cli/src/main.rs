use acquacotta_client::config::BACKEND_URL_ENV;
use acquacotta_client::ClientConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "acquacotta", version, about = "Acquacotta Pomodoro CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Recorded sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Timer durations and notification preferences
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Aggregated minutes for a day, week or month
    Report(commands::report::ReportArgs),
    /// Write sessions to a CSV file on the backend host
    Export(commands::report::ExportArgs),
    /// Client configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// List session categories and their colors
    Categories,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (config, load_error) = match ClientConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (
            ClientConfig::default().with_backend_override(std::env::var(BACKEND_URL_ENV).ok()),
            Some(e),
        ),
    };
    init_tracing(&config.log.filter);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "could not load client config, using defaults");
    }

    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Categories => commands::categories::run(),
        Commands::Timer { action } => commands::timer::run(action, &config).await,
        Commands::Session { action } => commands::session::run(action, &config).await,
        Commands::Settings { action } => commands::settings::run(action, &config).await,
        Commands::Report(args) => commands::report::run(args, &config).await,
        Commands::Export(args) => commands::report::export(args, &config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
