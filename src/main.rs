mod api;
mod app;
mod cache;
mod commands;
mod config;
mod event;
mod logging;
mod models;
mod notifications;
mod query;
mod session;
#[cfg(test)]
mod test_support;
mod ui;
mod validation;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vaxvet")]
#[command(about = "A terminal admin console for the VaxVet veterinary clinic API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/vaxvet/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base URL, overriding the config file and VAXVET_API_URL
  #[arg(long)]
  api_url: Option<String>,

  /// Clear the stored session and exit
  #[arg(long)]
  logout: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let sessions = session::SessionStore::open_default()?;
  if args.logout {
    sessions.clear()?;
    println!("Signed out.");
    return Ok(());
  }

  // Load configuration
  let config = config::Config::load(args.config.as_deref(), args.api_url)?;

  let _log_guard = logging::init(&config.log_level)?;
  tracing::info!(api = config.base_url(), "starting vaxvet");

  let stale_time = chrono::Duration::from_std(config.cache.stale_time())
    .map_err(|e| eyre!("Invalid cache.stale_secs: {}", e))?;
  let cache = if config.cache.persistent {
    cache::CacheLayer::new(cache::SqliteStorage::open_default()?)
  } else {
    cache::CacheLayer::new(cache::MemoryStorage::new())
  }
  .with_stale_time(stale_time);

  let api = api::ApiClient::new(config.base_url())?;
  let client = api::CachedClient::new(api, cache);

  // Initialize and run the app
  let mut app = app::App::new(config, client, sessions)?;
  app.run().await?;

  Ok(())
}
