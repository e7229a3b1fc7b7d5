use anyhow::{Context, Result};
use gigmate_core::analytics::DEFAULT_FLUSH_THRESHOLD;
use gigmate_core::Weights;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_gigmate_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSection,
    pub weights: Weights,
    pub analytics: AnalyticsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub city: String,
    /// IANA timezone used for the dinner-surge window.
    pub timezone: String,
    /// Simulated inference time before hotspots are returned.
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSection {
    pub flush_threshold: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            city: "Bangalore".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            latency_ms: 1500,
        }
    }
}

impl Default for AnalyticsSection {
    fn default() -> Self {
        Self {
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_gigmate_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("load {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse config.toml")?;
    cfg.weights.validate().context("invalid [weights]")?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = parse_config(
            r#"
[engine]
city = "Mumbai"

[weights]
rain = 2.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.engine.city, "Mumbai");
        assert_eq!(cfg.engine.timezone, "Asia/Kolkata");
        assert_eq!(cfg.weights.rain, 2.0);
        assert_eq!(cfg.weights.dinner_surge, 1.3);
        assert_eq!(cfg.analytics.flush_threshold, 5);
    }

    #[test]
    fn test_non_finite_weights_rejected() {
        assert!(parse_config("[weights]\nrain = nan\n").is_err());
        assert!(parse_config("[weights]\ndinner_surge = inf\n").is_err());
        assert!(parse_config("[weights]\nextreme_event = -2.0\n").is_err());
        assert!(parse_config("[weights]\nsurge_start_hour = 23\nsurge_end_hour = 19\n").is_err());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.engine.latency_ms, 1500);
        assert_eq!(back.weights, Weights::default());
    }
}
