//! Project configuration: types, discovery, loading, validation

pub mod defaults;
pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{find_config, load_config, load_config_from_dir};
pub use types::{
    AppConfig, Config, PathsConfig, ReleaseConfig, ReleaseEnvironment, SchemeConfig,
    SigningConfig, SigningStyle, TestConfig, ToolchainConfig, UploadConfig,
};
pub use validation::validate_config;
