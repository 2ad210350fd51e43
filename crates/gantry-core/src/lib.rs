//! Core library for Gantry build/test/release automation
//!
//! Holds the project configuration model (file discovery, parsing,
//! structural validation) shared by every other Gantry crate.

pub mod config;
pub mod error;

pub use config::{
    load_config, load_config_from_dir, AppConfig, Config, PathsConfig, ReleaseConfig,
    ReleaseEnvironment, SchemeConfig, SigningConfig, SigningStyle, TestConfig, ToolchainConfig,
    UploadConfig,
};
pub use error::{ConfigError, Result};
