//! Test matrix and release pipeline orchestration
//!
//! Two orchestrators with deliberately different failure models:
//! [`TestMatrixRunner`] treats scheme × destination cells as independent and
//! aggregates every outcome, while [`ReleasePipeline`] runs a dependent
//! package → export → publish chain that stops at the first failing stage.

pub mod clean;
pub mod error;
pub mod release;
pub mod results;
mod step;
pub mod test_matrix;

#[cfg(test)]
pub(crate) mod test_support;

pub use clean::clean;
pub use error::{Result, WorkflowError};
pub use release::{ReleaseOptions, ReleasePipeline};
pub use results::{ReleaseResult, SchemeResult, StageOutcome, TestMatrixResult, TestOutcome};
pub use test_matrix::{TestMatrixRunner, TestRunOptions};
