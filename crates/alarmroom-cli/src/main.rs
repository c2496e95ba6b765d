use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "alarmroom-cli", version, about = "Alarmroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reminder management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Register a reminder from a voice transcript
    Voice {
        /// Transcribed utterance, e.g. "5分後にコーヒーをセット"
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the scheduler in the foreground
    Watch,
    /// Run one scheduler step and report what fired
    Tick {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("ALARMROOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Voice { text, json } => commands::voice::run(&text, json),
        Commands::Watch => commands::watch::run_watch(),
        Commands::Tick { json } => commands::watch::run_tick(json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
