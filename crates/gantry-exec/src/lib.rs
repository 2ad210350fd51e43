//! Process invocation and streaming output handling for Gantry
//!
//! The pieces here are toolchain-agnostic: an immutable command description
//! ([`CommandInvocation`]), its captured result ([`CommandOutcome`]), an
//! incremental line splitter ([`LineBuffer`]), an executor that spawns and
//! drains child processes ([`CommandExecutor`], behind the [`CommandRunner`]
//! seam), and the verbosity-aware line classifier ([`OutputProcessor`]).

pub mod error;
pub mod executor;
pub mod invocation;
pub mod line_buffer;
pub mod output;

pub use error::{ExecError, Result};
pub use executor::{CommandExecutor, CommandRunner};
pub use invocation::{CommandInvocation, CommandOutcome};
pub use line_buffer::LineBuffer;
pub use output::{LineFormatter, OutputProcessor, PlainFormatter, XcodebuildFormatter};
