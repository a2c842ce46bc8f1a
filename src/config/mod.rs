use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub apar: AparConfig,
    pub analyzer: AnalyzerConfig,
    pub ui: UiConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AparConfig {
    pub url: String,
    pub max_age_days: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerConfig {
    pub command: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            apar: AparConfig {
                url: "http://www-304.ibm.com/webapp/set2/flrt/doc?page=aparCSV".to_string(),
                max_age_days: 5,
            },
            analyzer: AnalyzerConfig {
                command: "./flrtvc.ksh".to_string(),
            },
            ui: UiConfig { color: true },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    apar: Option<RawAparConfig>,
    analyzer: Option<RawAnalyzerConfig>,
    ui: Option<RawUiConfig>,
}

#[derive(Debug, Deserialize)]
struct RawAparConfig {
    url: Option<String>,
    max_age_days: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawAnalyzerConfig {
    command: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/flrt2html/config.toml")
}

pub fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("HOME environment variable is not set"))
}

pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s).context("failed to parse config file (TOML)")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(apar) = raw.apar {
        if let Some(url) = apar.url {
            cfg.apar.url = url;
        }
        if let Some(max_age_days) = apar.max_age_days {
            cfg.apar.max_age_days = max_age_days;
        }
    }

    if let Some(analyzer) = raw.analyzer {
        if let Some(command) = analyzer.command {
            cfg.analyzer.command = command;
        }
    }

    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("FLRT2HTML_APAR_URL") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.apar.url = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("FLRT2HTML_APAR_MAX_AGE_DAYS") {
        cfg.apar.max_age_days = v
            .trim()
            .parse::<u64>()
            .with_context(|| "FLRT2HTML_APAR_MAX_AGE_DAYS")?;
    }
    if let Ok(v) = std::env::var("FLRT2HTML_FLRTVC") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.analyzer.command = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("FLRT2HTML_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "FLRT2HTML_UI_COLOR")?;
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}
