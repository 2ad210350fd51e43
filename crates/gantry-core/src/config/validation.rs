//! Structural validation of loaded configuration

use std::collections::BTreeSet;

use crate::error::{ConfigError, Result};

use super::types::{Config, SigningStyle};

/// Validate a configuration after parsing.
///
/// Only structural checks live here; semantic problems (an unknown scheme
/// requested on the command line, a missing environment) surface later with
/// the valid alternatives attached.
pub fn validate_config(config: &Config) -> Result<()> {
    require(&config.app.name, "app.name")?;
    require(&config.app.bundle_id, "app.bundle_id")?;
    if config.app.project.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("app.project".to_string()));
    }
    require(&config.toolchain.version, "toolchain.version")?;

    if let Some(test) = &config.test {
        if test.schemes.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "test.schemes".to_string(),
                message: "at least one scheme is required".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for scheme in &test.schemes {
            require(&scheme.scheme, "test.schemes[].scheme")?;
            require(&scheme.build_destination, "test.schemes[].build_destination")?;
            if scheme.destinations.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("test.schemes.{}.destinations", scheme.scheme),
                    message: "at least one destination is required".to_string(),
                });
            }
            if !seen.insert(scheme.scheme.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "test.schemes".to_string(),
                    message: format!("duplicate scheme name: {}", scheme.scheme),
                });
            }
        }
    }

    if let Some(release) = &config.release {
        if release.environments.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "release.environments".to_string(),
                message: "at least one environment is required".to_string(),
            });
        }

        for (name, env) in &release.environments {
            let field = |suffix: &str| format!("release.environments.{name}.{suffix}");
            if env.scheme.is_empty() {
                return Err(ConfigError::MissingField(field("scheme")));
            }
            if env.output.is_empty() {
                return Err(ConfigError::MissingField(field("output")));
            }
            if env.export_options.as_os_str().is_empty() {
                return Err(ConfigError::MissingField(field("export_options")));
            }
            if env.signing.style == SigningStyle::Manual {
                if env.signing.identity.is_none() {
                    return Err(ConfigError::MissingField(field("signing.identity")));
                }
                if env.signing.profiles.is_empty() {
                    return Err(ConfigError::MissingField(field("signing.profiles")));
                }
            }
        }
    }

    Ok(())
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ConfigError::MissingField(field.to_string()));
    }
    Ok(())
}
