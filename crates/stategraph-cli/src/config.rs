//! Configuration file loading for the CLI
//!
//! Finds a TOML configuration file (explicit path, local directory or the
//! platform config directory) and loads it into an [`AppConfig`].

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use stategraph::{StategraphError, config::AppConfig};

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

impl From<ConfigError> for StategraphError {
    fn from(err: ConfigError) -> Self {
        StategraphError::Io(io::Error::other(err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (stategraph/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if an explicit path is given but missing, or if a config
/// file exists but cannot be read, parsed or validated.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, StategraphError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("stategraph/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "stategraph", "stategraph") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if the file doesn't exist, cannot be read, fails to parse,
/// or carries spacing values the layout cannot use.
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, StategraphError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;

    Ok(config)
}

/// Spacings must be finite and non-negative; the vertical spacing must be positive.
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let layout = config.layout();
    let spacings = [
        ("vertical_spacing", layout.vertical_spacing()),
        ("branch_spacing", layout.branch_spacing()),
        ("error_lane_offset", layout.error_lane_offset()),
        ("min_node_gap", layout.min_node_gap()),
    ];

    for (name, value) in spacings {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "`layout.{name}` must be a non-negative number, got {value}"
            )));
        }
    }

    if layout.vertical_spacing() == 0.0 {
        return Err(ConfigError::Validation(
            "`layout.vertical_spacing` must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let file = config_file(
            r#"
[layout]
vertical_spacing = 80.0
min_node_gap = 150.0

[output]
pretty = false
"#,
        );

        let config = load_config(Some(file.path())).expect("Failed to load config");
        assert_eq!(config.layout().vertical_spacing(), 80.0);
        assert_eq!(config.layout().branch_spacing(), 220.0);
        assert_eq!(config.layout().min_node_gap(), 150.0);
        assert!(!config.output().pretty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = config_file("");
        let config = load_config(Some(file.path())).expect("Failed to load config");
        assert_eq!(config.layout().error_lane_offset(), 220.0);
        assert!(config.output().pretty());
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = load_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let file = config_file("[layout\nvertical_spacing = ");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_negative_spacing_rejected() {
        let file = config_file("[layout]\nbranch_spacing = -10.0\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("layout.branch_spacing"));
    }

    #[test]
    fn test_zero_vertical_spacing_rejected() {
        let file = config_file("[layout]\nvertical_spacing = 0.0\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }
}
