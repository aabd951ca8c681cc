//! Binary entry point: read settings, start logging, connect the catalog
//! client and run the Ratatui event loop until the user exits.
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::info;

use bookstore_admin::config::BASE_URL_ENV;
use bookstore_admin::view::Route;
use bookstore_admin::{logging, run_app, ApiClient, App, AppConfig, Catalog, Dispatcher};

#[derive(Parser, Debug)]
#[command(name = "bookstore-admin")]
#[command(about = "Terminal admin console for a bookstore catalog", long_about = None)]
struct Cli {
    /// Page to open first: /, /authors, /books, /stores or /store/<id>
    route: Option<String>,

    /// Settings file to read instead of ~/.bookstore-admin/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// API base URL, overriding the settings file and the environment
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load settings")?;
    config.override_base_url(env::var(BASE_URL_ENV).ok());
    config.override_base_url(cli.base_url);

    let log_path = config.log_path().context("failed to resolve log file")?;
    logging::init(&log_path)?;

    let route = match cli.route.as_deref() {
        Some(path) => Route::parse(path).ok_or_else(|| anyhow!("unknown page: {path}"))?,
        None => Route::Shop,
    };

    let client = ApiClient::new(&config.api).context("failed to build API client")?;
    info!("starting at {route} against {}", client.base_url());
    let catalog: Arc<dyn Catalog> = Arc::new(client);

    let mut app = App::new(
        Dispatcher::new(catalog),
        route,
        Duration::from_millis(config.search_debounce_ms),
    );
    run_app(&mut app)
}
