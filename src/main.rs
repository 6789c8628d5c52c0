mod config;
mod error;
mod extract;
mod logging;
mod session;
mod writer;

use crate::config::Config;
use crate::error::Result;
use crate::extract::{Extractor, QuoteRecord};
use crate::logging::{init_logging, parse_log_level, LoggerConfig};
use crate::session::Session;
use crate::writer::RecordWriter;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (path may be given as the first argument)
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(&config_path)?;

    // Initialize logging with custom configuration
    let logger_config = LoggerConfig {
        directory: config.logging.directory.clone(),
        file_name: config.logging.filename.clone(),
        rotation: tracing_appender::rolling::Rotation::DAILY,
        level: parse_log_level(&config.logging.level)?,
    };
    init_logging(logger_config)?;

    log_info!("[main] Starting quotes scraper...");
    log_info!("[main] Configuration loaded from {}", config_path);
    log_info!("[main] Target: {}", config.url);

    // Acquire the browser session
    let mut builder = Session::builder()
        .webdriver_url(config.webdriver_url.as_str())
        .render_timeout(Duration::from_secs(config.render_timeout));
    if let Some(proxy) = &config.proxy {
        log_info!("[main] Routing traffic through proxy {}", proxy);
        builder = builder.proxy(proxy.as_str());
    }
    let mut session = builder.connect().await?;

    // Run extraction with the session held, then close it unconditionally
    // so the browser process is released on every exit path.
    let result = run_extraction(&mut session, &config).await;
    if let Err(e) = session.close().await {
        log_warn!("[main] Failed to close browser session: {}", e);
    }
    let records = match result {
        Ok(records) => records,
        Err(e) => {
            log_error!(&e => "[main] Extraction failed");
            return Err(e);
        }
    };

    // Nothing is written unless the whole extraction succeeded.
    log_info!(
        "[main] Saving {} record(s) to {}",
        records.len(),
        config.output_file
    );
    RecordWriter::new(&config.output_file).overwrite(&records)?;

    log_info!("[main] Done");
    Ok(())
}

async fn run_extraction(session: &mut Session, config: &Config) -> Result<Vec<QuoteRecord>> {
    log_info!("[main] Navigating to {}", config.url);
    let raw = session.fetch_raw(&config.url).await?;
    log_debug!(
        "[main] Captured {} bytes before render completion",
        raw.len()
    );

    log_info!(
        "[main] Waiting for marker element '.{}'...",
        config.marker_class
    );
    let rendered = session.wait_for_marker(&config.marker_class).await?;

    let extractor = Extractor::parse(&rendered)?;
    extractor.quotes().extract()
}
