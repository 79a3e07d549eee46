//! video-api: serves one stored video by id.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use playlist_fanout::config::load_config;
use playlist_fanout::lifecycle::startup;
use playlist_fanout::store::RedisStore;
use playlist_fanout::VIDEO_SERVICE;

#[derive(Parser)]
#[command(name = "video-api")]
#[command(about = "Video lookup service", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let tracer = startup::init_observability(VIDEO_SERVICE, &config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        flaky = config.faults.flaky,
        delay = config.faults.delay,
        "{} starting",
        VIDEO_SERVICE
    );

    let store = Arc::new(RedisStore::new(&config.store)?);
    let server = startup::video_server(&config, store, tracer.clone());
    startup::serve(server, &config).await?;
    tracer.flush();

    tracing::info!("Shutdown complete");
    Ok(())
}
