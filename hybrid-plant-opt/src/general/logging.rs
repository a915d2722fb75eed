//! Logger initialisation with colourised terminal output.

use std::env;
use std::io::IsTerminal;
use std::sync::OnceLock;

use anyhow::{Result, bail};
use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Fallback log level when H2PLANT_LOG_LEVEL is not set
const DEFAULT_LOG_LEVEL: &str = "info";

/// Initialise the program logger.
///
/// The level comes from the `H2PLANT_LOG_LEVEL` environment variable
/// (`off`/`error`/`warn`/`info`/`debug`/`trace`), defaulting to `info`.
/// Calling this more than once is a no-op.
pub fn init() -> Result<()> {
    let level = env::var("H2PLANT_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let level = match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {}", unknown),
    };

    if LOGGER_INIT.get().is_some() {
        return Ok(());
    }

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour = std::io::stdout().is_terminal();

    Dispatch::new()
        .format(move |out, message, record| {
            let level = if use_colour {
                colours.color(record.level()).to_string()
            } else {
                record.level().to_string()
            };
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%H:%M:%S"),
                level,
                record.target(),
                message
            ));
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;

    let _ = LOGGER_INIT.set(());
    Ok(())
}
