//! playlist-api: serves every playlist with its videos resolved through
//! video-api.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use playlist_fanout::config::load_config;
use playlist_fanout::lifecycle::startup;
use playlist_fanout::store::RedisStore;
use playlist_fanout::PLAYLIST_SERVICE;

#[derive(Parser)]
#[command(name = "playlist-api")]
#[command(about = "Playlist aggregation service", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let tracer = startup::init_observability(PLAYLIST_SERVICE, &config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "{} starting", PLAYLIST_SERVICE);

    let store = Arc::new(RedisStore::new(&config.store)?);
    let server = startup::playlist_server(&config, store, tracer.clone())?;
    startup::serve(server, &config).await?;
    tracer.flush();

    tracing::info!("Shutdown complete");
    Ok(())
}
