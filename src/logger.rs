use crate::config::{Config, LOG_TYPE_CONSOLE, LOG_TYPE_FILE};
use crate::utils::{ErrorStr, ResultV};

use std::fmt::Display;
use std::fs::OpenOptions;

use simplelog::{ColorChoice, LevelFilter, TerminalMode, TermLogger, WriteLogger};


const MODULE: &str = "LOGGER";


pub fn init_logger(cfg: &Config) -> ResultV {
    match cfg.log_type.as_str() {
        LOG_TYPE_CONSOLE => init_term_logger(cfg.log_level),
        LOG_TYPE_FILE    => init_file_logger(cfg.log_level, &cfg.log_file),
        _                => {
            eprintln!(
                "Unsupported log type: {}, only `file` and `console` are supported. Use `console` by default",
                cfg.log_type
            );
            init_term_logger(cfg.log_level)
        }
    }
}

/// Build an error mapper that logs the failure of `stage` and turns it into `err`
pub fn get_reporter<E: Display>(module: &'static str, stage: &'static str, err: ErrorStr) -> impl Fn(E) -> ErrorStr {
    move |e: E| {
        error!("[{}] {} failed: {}", module, stage, e);
        err
    }
}


fn prepare_logger_config() -> simplelog::Config {
    let mut builder = simplelog::ConfigBuilder::new();
    builder.set_time_format_custom(
        simplelog::format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        )
    );
    // Local offset can't be determined on every platform, UTC is kept then
    let _ = builder.set_time_offset_to_local();
    builder.build()
}

fn init_term_logger(level: LevelFilter) -> ResultV {
    TermLogger::init(
        level,
        prepare_logger_config(),
        TerminalMode::Stderr, ColorChoice::Auto
    ).map_err(|e| {
        eprintln!("[{}] Could not init terminal logger: {}", MODULE, e);
        "init logger error"
    })
}

fn init_file_logger(level: LevelFilter, filename: &str) -> ResultV {
    let file = OpenOptions::new().create(true).append(true).open(filename).map_err(|e| {
        eprintln!("[{}] Could not open log file {}: {}", MODULE, filename, e);
        "open log file error"
    })?;
    WriteLogger::init(level, prepare_logger_config(), file).map_err(|e| {
        eprintln!("[{}] Could not init file logger: {}", MODULE, e);
        "init logger error"
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_maps_any_error_to_given_str() {
        let reporter = get_reporter::<std::io::Error>("TEST", "Open", "open error");
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(reporter(err), "open error");
    }
}
