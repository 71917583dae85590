mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fleet",
    about = "Console for a remote machine fleet — login, status feed, and web UI gateway",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "FLEET_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an API token for subsequent sessions
    Login {
        /// API token (fo1_… or fm1_…)
        token: String,

        /// Organization slug (default: personal)
        #[arg(long)]
        org: Option<String>,
    },

    /// Forget the stored credential
    Logout,

    /// Show the platform status feed, or dismiss an entry
    Status {
        /// Dismiss the entry with this id instead of listing
        #[arg(long)]
        dismiss: Option<String>,

        /// Include entries that are not active incidents
        #[arg(long)]
        all: bool,
    },

    /// Launch the console gateway and open the web UI
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(fleet_core::config::config_path);

    let result = match cli.command {
        Commands::Login { token, org } => cmd::login::run(&token, org.as_deref(), cli.json),
        Commands::Logout => cmd::login::run_logout(cli.json),
        Commands::Status { dismiss, all } => cmd::status::run(&config_path, dismiss.as_deref(), all, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&config_path, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
