//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result, ResultExt};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed and validated settings
    pub schema: ConfigSchema,
    /// File the settings came from, `None` for built-in defaults
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when none is found.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !Path::new(p).exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_string()),
            None => find_config_file(),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        schema
            .validate()
            .context(config_path.as_deref().unwrap_or("built-in defaults").to_string())?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let mut candidates = vec![
        ".savemate.toml".to_string(),
        "savemate.toml".to_string(),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("savemate").join("config.toml").display().to_string());
    }

    candidates.into_iter().find(|candidate| Path::new(candidate).exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::new(ErrorCode::ConfigError, format!("Failed to read config file {}: {}", path, e))
            .with_source(e)
    })?;

    let schema: ConfigSchema = toml::from_str(&content)?;
    Ok(schema)
}
