//! Clean command - remove build and report directories

use clap::Args;
use console::style;

use gantry_core::load_config_from_dir;

use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Remove the configured build and report directories
#[derive(Debug, Args)]
pub struct CleanCommand {}

impl CleanCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<i32> {
        let working_dir = cli.working_dir()?;
        let (config, config_path) = load_config_from_dir(&working_dir)?;
        tracing::debug!(config = %config_path.display(), "loaded configuration");

        gantry_workflows::clean(&config, &working_dir).await?;

        if !cli.quiet && cli.format == OutputFormat::Text {
            println!("{} Cleaned build and report directories", style("✓").green());
        }

        Ok(exit_codes::SUCCESS)
    }
}
