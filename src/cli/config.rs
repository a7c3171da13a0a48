use anyhow::Context;
use grafana_builder::decoder::DecoderOptions;
use ringlog::Level;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Settings read from the optional `--config` TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    log: Log,
    #[serde(default)]
    render: Render,
    #[serde(default)]
    decoder: Decoder,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.log.level()?;
        Ok(config)
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn render(&self) -> &Render {
        &self.render
    }

    pub fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions {
            default_datasource: self.decoder.default_datasource.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Log {
    #[serde(default = "default_log_level")]
    level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Log {
    pub fn level(&self) -> anyhow::Result<Level> {
        Level::from_str(&self.level)
            .map_err(|_| anyhow::anyhow!("invalid log level '{}'", self.level))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Render {
    #[serde(default = "default_pretty")]
    pretty: bool,
}

impl Default for Render {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

impl Render {
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Decoder {
    #[serde(default)]
    default_datasource: Option<String>,
}
