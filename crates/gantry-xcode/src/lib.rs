//! Xcode toolchain discovery and xcodebuild command rendering
//!
//! [`ToolchainLocator`] finds the installed Xcode matching the configured
//! version; [`commands`] renders the domain operations (build, test,
//! archive, export, upload) into concrete [`CommandInvocation`]s.
//!
//! [`CommandInvocation`]: gantry_exec::CommandInvocation

pub mod commands;
pub mod error;
pub mod toolchain;

pub use error::{Result, XcodeError};
pub use toolchain::{ToolchainDescriptor, ToolchainLocator};
