use std::fs::OpenOptions;

use colored::Colorize;
use common::env_config::Config;
use middleware::logger::LoggerMiddleware;

pub mod middleware {
    pub mod logger;
}

pub fn setup(config: &Config) -> Result<(), fern::InitError> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(fern::InitError::Io)?;

    let level = if config.is_production() {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Debug
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            let color = match record.level() {
                log::Level::Info => "green",
                log::Level::Warn => "yellow",
                log::Level::Error => "red",
                log::Level::Debug => "magenta",
                log::Level::Trace => "bright black",
            };
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                record.target(),
                record.level().to_string().color(color),
                message
            ))
        })
        .level(level)
        .level_for("hyper", log::LevelFilter::Off)
        .level_for("hyper_util", log::LevelFilter::Off)
        .level_for("reqwest", log::LevelFilter::Warn)
        .level_for("h2", log::LevelFilter::Off)
        .chain(log_file);

    if config.console_logging_enabled {
        dispatch = dispatch.chain(std::io::stdout());
    }

    dispatch.apply()?;
    Ok(())
}

pub fn middleware(config: &Config) -> LoggerMiddleware {
    LoggerMiddleware::new(config.console_logging_enabled)
}
