//! Server configuration
//!
//! Layered: built-in defaults, optional `config.toml`, `APP_*` environment
//! variables (`__` separates nested keys, e.g. `APP_FILTER__CUTOFF_HZ`), then
//! plain `HOST` / `PORT`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use telefilter::FilterConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub filter: FilterConfig,
    pub recording: RecordingConfig,
    pub stream: StreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Write WAV files when a stream stops
    pub enabled: bool,
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Send each filtered chunk back on the stream as outbound media
    pub echo_filtered: bool,

    /// Band used for the end-of-call power report
    pub report_low_hz: f64,
    pub report_high_hz: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            filter: FilterConfig::default(),
            recording: RecordingConfig {
                enabled: true,
                output_dir: PathBuf::from("."),
                file_prefix: "twilio_call".to_string(),
            },
            stream: StreamConfig {
                echo_filtered: false,
                report_low_hz: 300.0,
                report_high_hz: 3400.0,
            },
        }
    }
}

impl AppConfig {
    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?);
        Ok(builder)
    }

    pub fn load() -> Result<Self> {
        let mut settings = Self::builder()?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }

        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }

        let config = settings
            .build()?
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok(config)
    }

    /// Defaults overlaid with a TOML document
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config = Self::builder()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("Server port cannot be 0");
        }

        self.filter.validate().context("Invalid filter configuration")?;

        let rate = self.filter.sample_rate_hz;
        if rate.fract() != 0.0 || rate > u32::MAX as f64 {
            bail!("Sample rate must be a whole number of Hz (got {})", rate);
        }

        if self.recording.file_prefix.is_empty() {
            bail!("Recording file prefix cannot be empty");
        }

        if self.stream.report_low_hz >= self.stream.report_high_hz {
            bail!(
                "Report band inverted: {} Hz >= {} Hz",
                self.stream.report_low_hz,
                self.stream.report_high_hz
            );
        }

        Ok(())
    }

    /// Stream sample rate in whole Hz; valid after `validate`
    pub fn sample_rate(&self) -> u32 {
        self.filter.sample_rate_hz as u32
    }
}
