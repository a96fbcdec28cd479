use freqscope_messages::ClientConfig;

use log::{LevelFilter, info};
use std::io::Write;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} - mod path |{}| - target | {} | args: |{}|",
                record.level(),
                record.module_path().unwrap_or(""),
                record.target(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Warn)
        .filter_module("freqscope", LevelFilter::Info)
        .filter_module("freqscope_stream", LevelFilter::Info)
        .filter_module("freqscope_ui", LevelFilter::Debug)
        .parse_default_env()
        .init();

    // Optional first argument overrides the source address
    let config = std::env::args()
        .nth(1)
        .map(ClientConfig::with_endpoint)
        .unwrap_or_default();

    info!("Streaming spectra from {}", config.endpoint);

    // Run UI on main thread (blocking); the app owns and stops the stream client
    freqscope_ui::run(config)?;

    Ok(())
}
