//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::Toml)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::Yaml)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each level the names from [`config_file_names`] are tried in order;
/// the first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL_TOML: &str = r#"
[app]
name = "Demo"
bundle_id = "com.example.demo"
project = "Demo.xcodeproj"

[toolchain]
version = "16.0"
"#;

    #[test]
    fn find_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("gantry.toml");
        std::fs::write(&config_path, MINIMAL_TOML).unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn find_config_prefers_toml_over_yaml() {
        let temp = TempDir::new().unwrap();
        let toml_path = temp.path().join("gantry.toml");
        let yaml_path = temp.path().join("gantry.yaml");
        std::fs::write(&toml_path, MINIMAL_TOML).unwrap();
        std::fs::write(&yaml_path, "app:\n  name: Demo\n").unwrap();

        let found = find_config(temp.path()).unwrap();
        assert_eq!(found, toml_path);
    }

    #[test]
    fn find_config_walks_parents() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("ios/app");
        std::fs::create_dir_all(&nested).unwrap();
        let config_path = temp.path().join("gantry.toml");
        std::fs::write(&config_path, MINIMAL_TOML).unwrap();

        let found = find_config(&nested);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("gantry.toml");
        std::fs::write(&config_path, MINIMAL_TOML).unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.app.name, "Demo");
        assert_eq!(config.toolchain.version, "16.0");
    }

    #[test]
    fn load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("gantry.yaml");
        std::fs::write(
            &config_path,
            "app:\n  name: Demo\n  bundle_id: com.example.demo\n  project: Demo.xcworkspace\ntoolchain:\n  version: '16.0'\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.app.name, "Demo");
        assert_eq!(config.app.project, PathBuf::from("Demo.xcworkspace"));
    }

    #[test]
    fn missing_config_reports_directory() {
        let temp = TempDir::new().unwrap();
        let err = load_config_from_dir(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
