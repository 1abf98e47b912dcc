//! This is the binary that runs the AURCA SOUND backend.
//! there are no tests or anything else in this file because the only thing it does is read the settings and start
//! the daemon with functions from the `aurca_daemon` library crate (which is tested).

use std::path::PathBuf;

use aurca_core::config::Settings;
use aurca_daemon::start_daemon;

use clap::Parser;

/// Options configurable via the CLI.
#[derive(Parser)]
#[clap(version, about)]
struct Flags {
    /// Sets the port number to listen on.
    #[clap(long)]
    port: Option<u16>,
    /// config file path
    #[clap(long)]
    config: Option<PathBuf>,
    /// log level
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let flags = Flags::try_parse()?;

    let config_file = match flags.config {
        Some(config) => config,
        None => Settings::get_config_path()?,
    };

    let settings = Settings::init(config_file, flags.port, flags.log_level)?;

    start_daemon(settings).await
}
