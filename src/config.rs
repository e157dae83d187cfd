use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::declarations::DeclarationNormalizerKind;
use crate::decode::QuoteNormalizationKind;

const CONFIG_DIR_NAME: &str = "marin-adapter";
const CONFIG_FILE_NAME: &str = "config.toml";

const QUOTE_NORMALIZATION_ENV: &str = "MARIN_QUOTE_NORMALIZATION";
const DECLARATION_NORMALIZATION_ENV: &str = "MARIN_DECLARATION_NORMALIZATION";
const TRACE_ENV: &str = "MARIN_TRACE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub quote_normalization: QuoteNormalizationKind,
    pub declaration_normalization: DeclarationNormalizerKind,
    pub trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    quote_normalization: Option<String>,
    declaration_normalization: Option<String>,
    trace: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    pub fn load_with_path(explicit_path: Option<&Path>) -> Result<Self> {
        let config_path = match explicit_path {
            Some(path) => {
                if !path.is_file() {
                    bail!(
                        "Failed to load config {}: file does not exist",
                        path.display()
                    );
                }
                path.to_path_buf()
            }
            None => discover_config_path()?,
        };
        let file_config = load_file_config(&config_path)?;

        dotenvy::dotenv().ok();

        let quote_normalization = parse_setting(
            env_non_empty(QUOTE_NORMALIZATION_ENV),
            file_config
                .as_ref()
                .and_then(|cfg| cfg.quote_normalization.as_deref())
                .and_then(non_empty),
            &config_path,
            "quote_normalization",
        )?;
        let declaration_normalization = parse_setting(
            env_non_empty(DECLARATION_NORMALIZATION_ENV),
            file_config
                .as_ref()
                .and_then(|cfg| cfg.declaration_normalization.as_deref())
                .and_then(non_empty),
            &config_path,
            "declaration_normalization",
        )?;

        let trace = match env_non_empty(TRACE_ENV) {
            Some(value) => parse_bool(&value)
                .map_err(|reason| config_error(&config_path, TRACE_ENV, &reason))?,
            None => file_config
                .as_ref()
                .and_then(|cfg| cfg.trace)
                .unwrap_or(false),
        };

        Ok(Self {
            config_path,
            quote_normalization,
            declaration_normalization,
            trace,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(CONFIG_FILE_NAME),
            quote_normalization: QuoteNormalizationKind::default(),
            declaration_normalization: DeclarationNormalizerKind::default(),
            trace: false,
        }
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir().ok_or_else(|| {
        anyhow!("Failed to resolve config path: HOME directory is unavailable")
    })?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text).map(Some).map_err(|err| {
        anyhow!(
            "Failed to load config {}: {err}",
            config_path.display()
        )
    })
}

fn parse_setting<T>(
    env_value: Option<String>,
    file_value: Option<&str>,
    config_path: &Path,
    key: &str,
) -> Result<T>
where
    T: FromStr<Err = String> + Default,
{
    if let Some(value) = env_value {
        return T::from_str(&value).map_err(|reason| config_error(config_path, key, &reason));
    }
    match file_value {
        Some(value) => T::from_str(value).map_err(|reason| config_error(config_path, key, &reason)),
        None => Ok(T::default()),
    }
}

fn parse_bool(value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("invalid boolean '{value}'")),
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn config_error(config_path: &Path, key_path: &str, reason: &str) -> anyhow::Error {
    anyhow!(
        "Failed to load config {}: {key_path}: {reason}",
        config_path.display()
    )
}
