//! Configuration IO helpers.

use std::fs;
use std::path::Path;

use crate::config::{MenuConfig, validate_config};
use crate::error::ConfigError;

impl MenuConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: MenuConfig = serde_json::from_str(content)?;
        validate_config(&config)?;
        Ok(config)
    }
}

/// Loads and validates a configuration file. A missing file yields the
/// defaults.
pub fn load_config_from_path(path: &Path) -> Result<MenuConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no menu configuration file; using defaults");
        return Ok(MenuConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    MenuConfig::from_json_str(&content)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from_path(&dir.path().join("menu.json")).unwrap();
        assert_eq!(config, MenuConfig::default());
    }

    #[test]
    fn test_loads_overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "classes": {{ "open": "is-open" }}, "thresholds": {{ "breakpointPx": 1024 }} }}"#).unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.classes.open, "is-open");
        assert_eq!(config.classes.active, "active");
        assert_eq!(config.thresholds.breakpoint_px, 1024.0);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(load_config_from_path(file.path()), Err(ConfigError::Parse(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "selectors": {{ "panelId": "" }} }}"#).unwrap();
        assert!(matches!(load_config_from_path(file.path()), Err(ConfigError::InvalidField { .. })));
    }
}
