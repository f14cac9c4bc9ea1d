use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::Path;

mod api;
mod devices;
mod schema;
mod signal_calculations;
mod storage;

use api::{ApiConfig, ApiServer};

fn main() -> anyhow::Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("wifi_network_simulator"), LevelFilter::Debug)
        .init();

    info!("Starting up");

    // Config file path may be given as the first argument; otherwise
    // config.toml next to the binary is used when present.
    let config = match std::env::args().nth(1) {
        Some(path) => ApiConfig::load(Path::new(&path))?,
        None => ApiConfig::load_or_default(Path::new("config.toml"))?,
    };

    let server = ApiServer::bind(&config.socket_addr())?;
    info!("Serving network state API on http://{}", server.local_addr()?);
    server.run()
}
