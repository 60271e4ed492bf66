//! Command line front end for the rules engine.
//!
//! Loads content from a data directory into an in-memory session and runs
//! one operation against it, printing plain text.
mod commands;
mod config;
mod report;
mod session;

use anyhow::Result;
use clap::Parser;
use commands::{Cast, CastConsumable, Prepare, Refocus, Rest, RunEncounter, Toggle};
use config::CliConfig;
use rules_runtime::RuntimeError;
use session::Session;

/// Rules engine command line
#[derive(Parser)]
#[command(name = "rules-cli")]
#[command(about = "Prepare actors, cast spells and run encounters", long_about = None)]
#[command(version)]
struct Cli {
    /// Content directory (overrides RULES_DATA_DIR)
    #[arg(short, long, global = true, value_name = "DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Act as this user (overrides RULES_USER)
    #[arg(short, long, global = true, value_name = "USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a preparation pass and print the derived data
    Prepare(Prepare),

    /// Cast a spell
    Cast(Cast),

    /// Cast from a scroll or wand
    CastConsumable(CastConsumable),

    /// Restore daily spellcasting resources
    Rest(Rest),

    /// Regain focus points
    Refocus(Refocus),

    /// Flip a roll-option toggle
    Toggle(Toggle),

    /// Run the encounter scenario
    Encounter(RunEncounter),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();
    let mut config = CliConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(user) = cli.user {
        config.user = Some(user.into());
    }

    let mut session = Session::load(&config)?;
    let result = match cli.command {
        Command::Prepare(cmd) => cmd.execute(&mut session).await,
        Command::Cast(cmd) => cmd.execute(&mut session).await,
        Command::CastConsumable(cmd) => cmd.execute(&mut session).await,
        Command::Rest(cmd) => cmd.execute(&mut session).await,
        Command::Refocus(cmd) => cmd.execute(&mut session).await,
        Command::Toggle(cmd) => cmd.execute(&mut session).await,
        Command::Encounter(cmd) => cmd.execute(&mut session).await,
    };

    if let Some(error) = result.as_ref().err().and_then(|e| e.downcast_ref::<RuntimeError>()) {
        match error.severity() {
            Some(severity) if severity.is_user_facing() => {
                tracing::warn!(code = error.error_code(), %severity, "command rejected");
            }
            severity => {
                tracing::error!(code = error.error_code(), severity = ?severity, "command failed");
            }
        }
    }
    result
}

/// Logs go to stderr so stdout stays plain output.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
