//! Engine configuration loading for the CLI.
//!
//! Resolution order: `--config <path>`, then `$ATTRITION_CONFIG`, then
//! `<config dir>/attrition/engine.json` if it exists, then built-in defaults.
//! An explicitly named file must exist; the default location is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use attrition_core::config::EngineConfig;
use tracing::{debug, info};

pub const CONFIG_ENV_VAR: &str = "ATTRITION_CONFIG";

/// `<config dir>/attrition/engine.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("attrition").join("engine.json"))
}

/// Read and validate an engine configuration file.
pub fn load_file(path: &Path) -> Result<EngineConfig> {
    let document = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    EngineConfig::from_json_str(&document)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Resolve the engine configuration and apply command-line overrides.
pub fn resolve(explicit: Option<PathBuf>, target_fraction: Option<f64>) -> Result<EngineConfig> {
    let named = explicit.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    let mut config = match named {
        Some(path) => {
            info!(path = %path.display(), "loading engine config");
            load_file(&path)?
        }
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => {
                info!(path = %path.display(), "loading engine config from default location");
                load_file(&path)?
            }
            None => {
                debug!("no config file found, using defaults");
                EngineConfig::default()
            }
        },
    };

    if let Some(fraction) = target_fraction {
        config.target_fraction = fraction;
        config
            .validate()
            .context("Invalid --target-fraction override")?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn explicit_file_loaded() {
        let file = write_config(r#"{"target_fraction": 0.7, "partition": {"name": "TF"}}"#);
        let cfg = resolve(Some(file.path().to_path_buf()), None).unwrap();
        assert_eq!(cfg.target_fraction, 0.7);
        assert_eq!(cfg.partition.name, "TF");
    }

    #[test]
    fn override_replaces_fraction() {
        let file = write_config(r#"{"target_fraction": 0.7}"#);
        let cfg = resolve(Some(file.path().to_path_buf()), Some(0.3)).unwrap();
        assert_eq!(cfg.target_fraction, 0.3);
    }

    #[test]
    fn nan_override_rejected() {
        let file = write_config("{}");
        assert!(resolve(Some(file.path().to_path_buf()), Some(f64::NAN)).is_err());
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(Some(dir.path().join("nope.json")), None).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config file"));
    }

    #[test]
    fn malformed_file_is_error() {
        let file = write_config("{ not json");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config file"));
    }

    #[test]
    fn default_path_ends_with_engine_json() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("attrition/engine.json"));
        }
    }
}
