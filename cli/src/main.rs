use std::path::PathBuf;

use clap::{Parser, Subcommand};
use volley_cli::{commands, logging};

#[derive(Parser)]
#[command(name = "volley", version, about = "Cooldown scheduling and weapon auto-fire")]
struct Cli {
    /// TOML config file (defaults to the per-user config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an auto-fire session against a simulated target
    Simulate {
        /// Weapon as NAME=SHOTS_PER_SECOND (repeatable)
        #[arg(short, long = "weapon", value_parser = commands::parse_weapon)]
        weapons: Vec<(String, f64)>,
        /// Session length in seconds
        #[arg(short, long, default_value_t = 5.0)]
        seconds: f64,
        /// Seconds before the target becomes selectable
        #[arg(long, default_value_t = 0.0)]
        target_after: f64,
        /// Seconds after which the target is lost
        #[arg(long)]
        target_lost_at: Option<f64>,
        /// Tick on the wall clock instead of accelerated virtual time
        #[arg(long)]
        realtime: bool,
    },
    /// Inspect or persist configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write the effective configuration
    Save,
    /// Print the per-user config file location
    Path,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    logging::init();
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Simulate {
            weapons,
            seconds,
            target_after,
            target_lost_at,
            realtime,
        } => {
            let config = commands::load_config(config_path)?;
            let opts = commands::SimulateOptions {
                weapons,
                seconds,
                target_after,
                target_lost_at,
                realtime,
            };
            commands::simulate(&config, opts).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::show_config(&commands::load_config(config_path)?),
            ConfigAction::Save => {
                commands::save_config(&commands::load_config(config_path)?, config_path)
            }
            ConfigAction::Path => commands::show_config_path(),
        },
    }
}
