use clap::Parser;
use mockprock_desktop::ServerConfig;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mockprock-desktop", version, about = "MockProck server: emulated desktop agent and mock proctoring provider")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "MOCKPROCK_DESKTOP_BIND", default_value = "0.0.0.0:11136")]
    bind: String,

    /// Seconds /desktop/stop holds its response while "uploading"
    #[arg(long, env = "MOCKPROCK_STOP_DELAY_SECS", default_value_t = 60)]
    stop_delay_secs: u64,

    /// Seconds between finishing an attempt and its review callback
    #[arg(long, env = "MOCKPROCK_REVIEW_DELAY_SECS", default_value_t = 10)]
    review_delay_secs: u64,

    /// Seconds between the download page and the ready callback
    #[arg(long, env = "MOCKPROCK_READY_DELAY_SECS", default_value_t = 2)]
    ready_delay_secs: u64,
}

/// `RUST_LOG` wins when it parses; otherwise everything at info.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let app = mockprock_desktop::app(ServerConfig {
        stop_delay: Duration::from_secs(args.stop_delay_secs),
        review_delay: Duration::from_secs(args.review_delay_secs),
        ready_delay: Duration::from_secs(args.ready_delay_secs),
    });
    let listener = TcpListener::bind(args.bind.as_str()).await?;
    info!("mockprock listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
