use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use larder_client::session::DEFAULT_TIMEOUT_MINUTES;
use larder_client::SessionPolicy;

use crate::state::ensure_larder_home;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiSection,
    pub session: SessionSection,
    pub budget: BudgetSection,
    pub display: DisplaySection,
    pub catalog: CatalogSection,
    pub smart_fill: SmartFillSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSection {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSection {
    /// Minutes a login stays valid (minimum 1).
    pub timeout_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetSection {
    /// Used until the user sets a limit of their own.
    pub default_limit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySection {
    /// IANA zone used for displayed dates.
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSection {
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmartFillSection {
    pub remote_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSection {
                base_url: "http://localhost:8080".to_string(),
            },
            session: SessionSection {
                timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            },
            budget: BudgetSection { default_limit: 2500.0 },
            display: DisplaySection {
                timezone: "Asia/Kolkata".to_string(),
            },
            catalog: CatalogSection { limit: 1000 },
            smart_fill: SmartFillSection { remote_limit: 8 },
        }
    }
}

impl Config {
    /// Apply `LARDER_API_URL` / `LARDER_SESSION_TIMEOUT_MINUTES`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("LARDER_API_URL").filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("LARDER_SESSION_TIMEOUT_MINUTES") {
            match raw.trim().parse::<i64>() {
                Ok(minutes) => self.session.timeout_minutes = minutes,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid LARDER_SESSION_TIMEOUT_MINUTES"),
            }
        }
        self
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy::new(self.session.timeout_minutes)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.display
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid [display] timezone '{}': {e}", self.display.timezone))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_larder_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    let cfg = if p.exists() {
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        toml::from_str(&s).context("parse config.toml")?
    } else {
        Config::default()
    };
    Ok(cfg.with_env_overrides(|k| std::env::var(k).ok()))
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
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert!(s.contains("[smart_fill]"));
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[api]\nbase_url = \"https://groceries.example\"\n").unwrap();
        assert_eq!(cfg.api.base_url, "https://groceries.example");
        assert_eq!(cfg.session.timeout_minutes, 60);
        assert_eq!(cfg.budget.default_limit, 2500.0);
        assert_eq!(cfg.timezone().unwrap(), chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = Config::default().with_env_overrides(|k| match k {
            "LARDER_API_URL" => Some(" https://api.example ".into()),
            "LARDER_SESSION_TIMEOUT_MINUTES" => Some("0".into()),
            _ => None,
        });
        assert_eq!(cfg.api.base_url, "https://api.example");
        assert_eq!(cfg.session_policy().timeout_minutes(), 1);

        let cfg = Config::default().with_env_overrides(|k| {
            (k == "LARDER_SESSION_TIMEOUT_MINUTES").then(|| "soon".to_string())
        });
        assert_eq!(cfg.session.timeout_minutes, 60);
    }

    #[test]
    fn test_bad_timezone() {
        let mut cfg = Config::default();
        cfg.display.timezone = "Mars/Olympus".into();
        assert!(cfg.timezone().is_err());
    }
}
