//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use procession::{ProcessionError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for ProcessionError {
    fn from(err: ConfigError) -> Self {
        ProcessionError::Config(err.to_string())
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    Explicit,
    Local,
    System,
}

impl ConfigSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Local => "local",
            Self::System => "system",
        }
    }
}

/// Relative path probed before the platform config directory.
const LOCAL_CONFIG: &str = "procession/config.toml";

/// Picks the configuration file to load, if any.
///
/// An explicit path always wins, even when it does not exist, so a typo on
/// the command line is reported instead of silently falling through.
fn locate(explicit_path: Option<&Path>) -> Option<(ConfigSource, PathBuf)> {
    if let Some(path) = explicit_path {
        return Some((ConfigSource::Explicit, path.to_path_buf()));
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Some((ConfigSource::Local, local));
    }

    let Some(dirs) = ProjectDirs::from("com", "procession", "procession") else {
        debug!("Could not determine platform-specific config directory");
        return None;
    };
    let system = dirs.config_dir().join("config.toml");
    if system.exists() {
        return Some((ConfigSource::System, system));
    }
    debug!(path = system.display().to_string(); "System configuration file not found");
    None
}

/// Find and load configuration.
///
/// Search order: the explicit path, then `procession/config.toml`, then the
/// platform config directory. Defaults apply when none is found.
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file cannot be parsed, names invalid colors, or sets unusable
///   solver distances
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ProcessionError> {
    let explicit_path: Option<&Path> = explicit_path.as_ref().map(|path| path.as_ref());
    let Some((source, path)) = locate(explicit_path) else {
        debug!("No configuration file found, using default configuration");
        return Ok(AppConfig::default());
    };

    info!(
        source = source.as_str(),
        path = path.display().to_string();
        "Loading configuration"
    );
    load_config_file(&path)
}

/// Load and validate configuration from a TOML file
fn load_config_file(path: &Path) -> Result<AppConfig, ProcessionError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    config.style().palette().map_err(ConfigError::Validation)?;
    validate_solver(&config)?;

    Ok(config)
}

/// Rejects solver distances that would make every drag interval empty or NaN.
fn validate_solver(config: &AppConfig) -> Result<(), ConfigError> {
    let solver = config.solver();
    for (name, value) in [("padding", solver.padding()), ("min_gap", solver.min_gap())] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "solver.{name} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_explicit_config() {
        let file = write_config(
            r##"
            [layout]
            item_spacing = 120.0

            [solver]
            min_gap = 45.0

            [style]
            active_interface_color = "#2563eb"
            "##,
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout().item_spacing(), 120.0);
        assert_eq!(config.layout().box_padding(), 20.0);
        assert_eq!(config.solver().min_gap(), 45.0);
        let palette = config.style().palette().unwrap();
        assert_eq!(palette.interface(true).to_hex_string(), "#2563eb");
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ProcessionError::Config(msg) if msg.contains("Missing")));
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("[layout\nitem_spacing = ");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ProcessionError::Config(msg) if msg.contains("TOML")));
    }

    #[test]
    fn test_negative_gap_rejected() {
        let file = write_config("[solver]\nmin_gap = -5.0\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ProcessionError::Config(msg) if msg.contains("solver.min_gap")));
    }

    #[test]
    fn test_explicit_path_wins() {
        let (source, path) = locate(Some(Path::new("elsewhere.toml"))).unwrap();
        assert_eq!(source, ConfigSource::Explicit);
        assert_eq!(path, PathBuf::from("elsewhere.toml"));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let file = write_config("[style]\nactivity_color = \"greenish\"\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ProcessionError::Config(msg) if msg.contains("activity_color")));
    }
}
