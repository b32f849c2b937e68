use clap::{Parser, Subcommand};
use colored::Colorize;
use mockprock_adapter::{AdapterConfig, DesktopAdapter, DEFAULT_BASE_URL};
use std::process;
use std::time::Duration;

mod commands;

#[derive(Parser)]
#[command(name = "mockprockx", version, about = "MockProck host driver: fire lifecycle callbacks at a desktop agent")]
struct Cli {
    /// Desktop agent base URL
    #[arg(long, env = "MOCKPROCK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an exam attempt (POST /desktop/start)
    Start,
    /// End an exam attempt (POST /desktop/stop)
    Stop,
    /// Liveness ping (GET /desktop/ping)
    Ping,
    /// Start, ping repeatedly, then stop
    Session {
        /// Number of pings between start and stop
        #[arg(long, default_value_t = 3)]
        pings: u32,
        /// Milliseconds between pings
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let result = match DesktopAdapter::new(AdapterConfig::new(cli.base_url)) {
        Ok(adapter) => match cli.command {
            Commands::Start => commands::start(&adapter).await,
            Commands::Stop => commands::stop(&adapter).await,
            Commands::Ping => commands::ping(&adapter).await,
            Commands::Session { pings, interval_ms } => {
                commands::session(&adapter, pings, Duration::from_millis(interval_ms)).await
            }
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => process::exit(commands::EXIT_OK),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(commands::exit_code_for(&e));
        }
    }
}
