use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::application::ScheduleSettings;
use crate::domain::{Color, Theme, TriggerPolicy, TriggerStrictness};
use crate::infrastructure::opensea_provider;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: f64,
    #[serde(default = "default_pacing_delay")]
    pub pacing_delay_seconds: f64,
    #[serde(default)]
    pub price_trigger_strictness: TriggerStrictness,
    #[serde(default = "default_store_path")]
    pub store_path: String,
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_error_color")]
    pub error_color: String,
    #[serde(default)]
    pub opensea: OpenSeaCfg,
    #[serde(default)]
    pub discord: DiscordCfg,
    pub http: Option<HttpCfg>,
}

#[derive(Debug, Deserialize)]
pub struct OpenSeaCfg {
    #[serde(default = "default_opensea_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for OpenSeaCfg {
    fn default() -> Self {
        Self {
            base_url: default_opensea_base_url(),
            api_key: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DiscordCfg {
    pub bot_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HttpCfg {
    pub bind: String,
    pub api_token: Option<String>,
}

fn default_poll_interval() -> f64 {
    30.0
}

fn default_pacing_delay() -> f64 {
    2.0
}

fn default_store_path() -> String {
    "notifiers.json".to_string()
}

fn default_prefix() -> String {
    "--".to_string()
}

fn default_primary_color() -> String {
    "0x2081e2".to_string()
}

fn default_error_color() -> String {
    "0xe0245e".to_string()
}

fn default_opensea_base_url() -> String {
    opensea_provider::DEFAULT_BASE_URL.to_string()
}

impl Config {
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let raw = expand_env(raw);
        let cfg: Config = serde_yaml::from_str(&raw)?;
        cfg.schedule()?;
        cfg.theme()?;
        Ok(cfg)
    }

    pub fn schedule(&self) -> anyhow::Result<ScheduleSettings> {
        if !self.poll_interval_seconds.is_finite() || self.poll_interval_seconds <= 0.0 {
            bail!(
                "poll_interval_seconds must be positive, got {}",
                self.poll_interval_seconds
            );
        }
        if !self.pacing_delay_seconds.is_finite() || self.pacing_delay_seconds < 0.0 {
            bail!(
                "pacing_delay_seconds must not be negative, got {}",
                self.pacing_delay_seconds
            );
        }
        Ok(ScheduleSettings {
            poll_interval: Duration::from_secs_f64(self.poll_interval_seconds),
            pacing_delay: Duration::from_secs_f64(self.pacing_delay_seconds),
        })
    }

    pub fn theme(&self) -> anyhow::Result<Theme> {
        let parse = |name: &str, v: &str| {
            Color::parse_hex(v).with_context(|| format!("{name} is not a hex color: {v}"))
        };
        Ok(Theme {
            primary: parse("primary_color", &self.primary_color)?,
            error: parse("error_color", &self.error_color)?,
        })
    }

    pub fn policy(&self) -> TriggerPolicy {
        TriggerPolicy::new(self.price_trigger_strictness)
    }

    /// Blank values and unexpanded `${VAR}` placeholders count as absent.
    pub fn discord_token(&self) -> Option<String> {
        non_empty(self.discord.bot_token.as_deref())
    }

    pub fn opensea_api_key(&self) -> Option<String> {
        non_empty(self.opensea.api_key.as_deref())
    }

    pub fn http_api_token(&self) -> Option<String> {
        non_empty(self.http.as_ref().and_then(|h| h.api_token.as_deref()))
    }
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with("${"))
        .map(str::to_string)
}

/// very small ${VAR} expansion to keep config simple
fn expand_env(s: &str) -> String {
    let mut out = s.to_string();
    for (k, v) in std::env::vars() {
        out = out.replace(&format!("${{{}}}", k), &v);
    }
    out
}
