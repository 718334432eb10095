mod commands;
mod config;
mod routes;
mod ui;

use clap::{Parser, Subcommand};
use commands::{AlreadyReported, AppContext};
use config::{default_data_dir, BackendKind, CliConfig};
use luckydraw_core::LuckyDrawError;
use routes::Route;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "luckydraw")]
#[command(about = "Lucky Draw - pick random winners from a participant list")]
#[command(version)]
struct Cli {
    /// Data directory for the local store and config.json
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Where participants and history are kept (overrides config.json)
    #[arg(short, long, global = true, value_enum)]
    backend: Option<BackendKind>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive app at a page ("/", "/manage", "/lottery")
    Open {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Participant management commands
    #[command(subcommand)]
    Participant(commands::ParticipantCommands),

    /// Draw winners from the current participants
    Draw {
        /// Number of winners (prompts if omitted)
        #[arg(short, long)]
        count: Option<usize>,
        /// Reveal immediately without the tile animation
        #[arg(long)]
        no_animation: bool,
    },

    /// Show recent winners, newest first
    History {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let mut config = CliConfig::load(&data_dir)?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    config.verbose |= cli.verbose;

    // Initialize logging
    let log_level = if config.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "luckydraw={0},luckydraw_core={0},luckydraw_lottery={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match AppContext::from_config(&config).await {
        Ok(context) => dispatch(cli.command, &context).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        if e.downcast_ref::<AlreadyReported>().is_some() {
            std::process::exit(1);
        }

        let core_error = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<LuckyDrawError>());

        match core_error {
            Some(LuckyDrawError::NetworkConnection(msg)) => {
                eprintln!("Error: Could not reach the store: {}", msg);
                eprintln!("Check rest.base_url in config.json or use --backend local");
            }
            Some(LuckyDrawError::Remote { status, message }) => {
                eprintln!("Error: The store rejected the request ({})", status);
                eprintln!("{}", message);
            }
            Some(LuckyDrawError::Config(msg)) => {
                eprintln!("Error: Invalid configuration: {}", msg);
            }
            _ => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn dispatch(command: Option<Commands>, context: &AppContext) -> anyhow::Result<()> {
    match command {
        None => commands::run_interactive(Route::Landing, context).await,
        Some(Commands::Open { path }) => {
            commands::run_interactive(Route::from_path(&path), context).await
        }
        Some(Commands::Participant(cmd)) => commands::handle_participant_command(cmd, context).await,
        Some(Commands::Draw {
            count,
            no_animation,
        }) => commands::handle_draw_command(count, no_animation, context).await,
        Some(Commands::History { limit }) => commands::handle_history_command(limit, context).await,
    }
}
