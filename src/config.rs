use std::env;
use std::fmt::Formatter;
use std::path::PathBuf;
use std::time::Duration;

use dotenv::dotenv;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_DATA_PATH: &str = "data/suburb_medians_sample.csv";
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600 * 24;
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 20;

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { name: &'static str, value: String }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{} must be a non-negative integer, got {:?}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for std::io::Error {
    fn from(error: ConfigError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, error)
    }
}

#[derive(Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration
}

// Keeps the key out of logs.
impl std::fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_host: String,
    pub port: u16,
    pub data_path: PathBuf,
    /// `None` disables the background refresh.
    pub refresh_interval: Option<Duration>,
    /// `None` when no API key is configured.
    pub openai: Option<OpenAiSettings>
}

impl Settings {
    /// Reads settings from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Settings, ConfigError> {
        dotenv().ok();
        Settings::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let refresh_secs = parse_var(&lookup, "DATA_REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_INTERVAL_SECS)?;
        let summary_timeout = parse_var(&lookup, "SUMMARY_TIMEOUT_SECS", DEFAULT_SUMMARY_TIMEOUT_SECS)?;

        let openai = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| OpenAiSettings {
                api_key: api_key.trim().to_owned(),
                api_url: lookup("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_owned()),
                model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_owned()),
                timeout: Duration::from_secs(summary_timeout)
            });

        Ok(Settings {
            bind_host: lookup("BIND_HOST").unwrap_or_else(|| DEFAULT_BIND_HOST.to_owned()),
            port,
            data_path: lookup("SUBURB_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            refresh_interval: if refresh_secs == 0 {
                None
            } else {
                Some(Duration::from_secs(refresh_secs))
            },
            openai
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
        T: std::str::FromStr
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
