use std::str::FromStr;

use config::{ConfigBuilder, Environment, File};
use config::builder::DefaultState;
use serde::{Deserialize as _, Deserializer};
use serde_derive::Deserialize;
use simplelog::LevelFilter;


const ENV_PREFIX: &str = "TGWEBHOOK";
const ENV_SEPARATOR: &str = "__";

pub const LOG_TYPE_CONSOLE: &str = "console";
pub const LOG_TYPE_FILE: &str = "file";


#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { host: default_host(), port: default_port(), workers: default_workers() }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_log_type")]
    pub log_type: String,
    #[serde(default = "default_log_level", deserialize_with = "deserialize_level")]
    pub log_level: LevelFilter,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_workers() -> usize { 4 }
fn default_log_type() -> String { LOG_TYPE_CONSOLE.to_string() }
fn default_log_level() -> LevelFilter { LevelFilter::Info }
fn default_log_file() -> String { "tgwebhook.log".to_string() }

// Level names are matched case-insensitively, `info` and `INFO` are the same
fn deserialize_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LevelFilter, D::Error> {
    let name = String::deserialize(deserializer)?;
    LevelFilter::from_str(&name)
        .map_err(|_| serde::de::Error::custom(format!("unknown log level `{}`", name)))
}


impl Config {
    /// Load config from file `path`, then apply `TGWEBHOOK__*` environment overrides
    pub fn load(path: &str) -> Result<Config, config::ConfigError> {
        Self::load_with_env(path, ENV_PREFIX)
    }

    fn load_with_env(path: &str, env_prefix: &str) -> Result<Config, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
            );
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Config, config::ConfigError> {
        let cfg: Config = builder.build()?.try_deserialize()?;
        if cfg.server.workers == 0 {
            return Err(config::ConfigError::Message("server.workers must be at least 1".to_string()));
        }
        Ok(cfg)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const SAMPLE_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tgwebhook.toml");

    fn parse(toml: &str) -> Result<Config, config::ConfigError> {
        Config::from_builder(
            config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml))
        )
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.address(), "0.0.0.0:8080");
        assert_eq!(cfg.server.workers, 4);
        assert_eq!(cfg.log_type, LOG_TYPE_CONSOLE);
        assert_eq!(cfg.log_level, LevelFilter::Info);
        assert_eq!(cfg.log_file, "tgwebhook.log");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = parse(
            r#"
            log_type = "file"
            log_level = "debug"
            log_file = "/tmp/hook.log"

            [server]
            host = "127.0.0.1"
            port = 9000
            workers = 2
            "#,
        ).unwrap();
        assert_eq!(cfg.address(), "127.0.0.1:9000");
        assert_eq!(cfg.server.workers, 2);
        assert_eq!(cfg.log_type, LOG_TYPE_FILE);
        assert_eq!(cfg.log_level, LevelFilter::Debug);
        assert_eq!(cfg.log_file, "/tmp/hook.log");
    }

    #[test]
    fn level_names_ignore_case() {
        assert_eq!(parse("log_level = \"WARN\"").unwrap().log_level, LevelFilter::Warn);
        assert_eq!(parse("log_level = \"Trace\"").unwrap().log_level, LevelFilter::Trace);
        assert_eq!(parse("log_level = \"off\"").unwrap().log_level, LevelFilter::Off);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = parse("log_level = \"loud\"").unwrap_err();
        assert!(err.to_string().contains("unknown log level `loud`"), "{}", err);
    }

    #[test]
    fn sample_config_file_loads() {
        let cfg = Config::load(SAMPLE_CONFIG).unwrap();
        assert_eq!(cfg.address(), "0.0.0.0:8080");
        assert_eq!(cfg.server.workers, 4);
        assert_eq!(cfg.log_type, LOG_TYPE_CONSOLE);
        assert_eq!(cfg.log_level, LevelFilter::Info);
        assert_eq!(cfg.log_file, "tgwebhook.log");
    }

    #[test]
    fn environment_overrides_file() {
        // Own prefix so parallel tests loading the sample file see no overrides
        std::env::set_var("TGWEBHOOK_ENVTEST__LOG_LEVEL", "warn");
        std::env::set_var("TGWEBHOOK_ENVTEST__SERVER__PORT", "9090");
        let cfg = Config::load_with_env(SAMPLE_CONFIG, "TGWEBHOOK_ENVTEST").unwrap();
        std::env::remove_var("TGWEBHOOK_ENVTEST__LOG_LEVEL");
        std::env::remove_var("TGWEBHOOK_ENVTEST__SERVER__PORT");

        assert_eq!(cfg.log_level, LevelFilter::Warn);
        assert_eq!(cfg.address(), "0.0.0.0:9090");
        assert_eq!(cfg.server.workers, 4);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = parse("[server]\nworkers = 0\n").unwrap_err();
        assert!(err.to_string().contains("workers"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/tgwebhook-config").is_err());
    }
}
