use anyhow::Result;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::constants::{http, storage};

/// Log output format selected through `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Root of the date-partitioned transcript tree
    pub transcript_dir: PathBuf,
    /// Shared secret for signature verification; `None` disables verification
    pub webhook_secret: Option<String>,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Optional request body cap in bytes; unbounded when unset
    pub max_body_size: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transcript_dir = match lookup("TRANSCRIPT_DIR").filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_transcript_dir()?,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "LOG_FORMAT must be `pretty` or `json`, got `{}`",
                    other
                ))
            }
        };

        Ok(Config {
            host: lookup("WEBHOOK_HOST")
                .unwrap_or_else(|| http::DEFAULT_HOST.to_string())
                .parse::<IpAddr>()
                .map_err(|e| anyhow::anyhow!("WEBHOOK_HOST is not an IP address: {}", e))?,
            port: parse_or("WEBHOOK_PORT", &lookup, http::DEFAULT_PORT)?,
            transcript_dir,
            webhook_secret: lookup("ELEVENLABS_WEBHOOK_SECRET").filter(|s| !s.is_empty()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
            max_body_size: lookup("MAX_BODY_SIZE")
                .filter(|v| !v.trim().is_empty())
                .map(|raw| {
                    raw.trim().parse::<usize>().map_err(|e| {
                        anyhow::anyhow!("MAX_BODY_SIZE has an invalid value `{}`: {}", raw, e)
                    })
                })
                .transpose()?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn signature_verification_enabled(&self) -> bool {
        self.webhook_secret.is_some()
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value `{}`: {}", key, raw, e)),
        None => Ok(default),
    }
}

fn default_transcript_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        anyhow::anyhow!("TRANSCRIPT_DIR is not set and the home directory could not be resolved")
    })?;
    Ok(home.join(storage::DEFAULT_RELATIVE_ROOT))
}
