//! Configuration persistence for sidetree settings.
//!
//! Settings are stored in `~/.config/sidetree/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Start in the flat file list instead of the folder tree.
    pub flat_view: bool,
    /// Fixed comparison branch; detected when unset.
    pub branch: Option<String>,
    pub context_lines: usize,
    pub pane_width: usize,
    pub syntax_theme: String,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flat_view: false,
            branch: None,
            context_lines: 3,
            pane_width: 80,
            syntax_theme: "base16-ocean.dark".to_string(),
            color: true,
        }
    }
}

/// Returns the path to the config file: `~/.config/sidetree/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sidetree").join("config.toml"))
}

/// Load configuration from disk. Returns default if file is missing or invalid.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

/// Save configuration to disk. Creates the config directory if needed.
pub fn save(config: &Config) -> std::io::Result<()> {
    let Some(path) = config_path() else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine config directory",
        ));
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    std::fs::write(&path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.flat_view);
        assert!(config.branch.is_none());
        assert_eq!(config.context_lines, 3);
        assert_eq!(config.pane_width, 80);
        assert!(config.color);
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = Config {
            flat_view: true,
            branch: Some("develop".to_string()),
            context_lines: 5,
            pane_width: 100,
            syntax_theme: "InspiredGitHub".to_string(),
            color: false,
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let partial = r#"
            flat_view = true
        "#;

        let config: Config = toml::from_str(partial).unwrap();
        assert!(config.flat_view);
        assert_eq!(config.context_lines, 3);
        assert_eq!(config.pane_width, 80);
        assert_eq!(config.syntax_theme, "base16-ocean.dark");
    }

    #[test]
    fn test_invalid_toml_returns_default() {
        let invalid = "this is not valid toml {{{{";
        let config: Config = toml::from_str(invalid).unwrap_or_default();
        assert_eq!(config, Config::default());
    }
}
