//! Release command - run one environment's release chain

use clap::Args;
use console::style;

use gantry_core::load_config_from_dir;
use gantry_workflows::{ReleaseOptions, ReleasePipeline, ReleaseResult, StageOutcome};

use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Run a release environment's package → export → publish chain
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// Release environment name (e.g. "beta", "prod")
    pub environment: String,

    /// Run only the package stage
    #[arg(long, conflicts_with_all = ["skip_upload", "upload_only"])]
    pub archive_only: bool,

    /// Run package and export, skip publish
    #[arg(long, conflicts_with = "upload_only")]
    pub skip_upload: bool,

    /// Run only the publish stage, reusing prior artifacts
    #[arg(long)]
    pub upload_only: bool,

    /// Render and log commands without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Per-command timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ReleaseCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<i32> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<i32> {
        let working_dir = cli.working_dir()?;
        let (config, config_path) = load_config_from_dir(&working_dir)?;
        tracing::debug!(config = %config_path.display(), "loaded configuration");

        if !cli.quiet && cli.format == OutputFormat::Text {
            println!();
            println!(
                "{} {}",
                style("Releasing").bold(),
                style(&self.environment).cyan().bold()
            );
            if self.dry_run {
                println!("  {}", style("(DRY RUN)").yellow().bold());
            }
            println!();
        }

        let pipeline = ReleasePipeline::new(
            config,
            &working_dir,
            super::build_executor(&working_dir, self.dry_run, self.timeout),
            super::build_processor(cli),
        );

        let options = ReleaseOptions {
            archive_only: self.archive_only,
            skip_upload: self.skip_upload,
            upload_only: self.upload_only,
        };

        let result = pipeline.release(&self.environment, &options).await?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Text => {
                if !cli.quiet {
                    print_pretty(&result);
                }
            }
        }

        Ok(if result.has_failures() {
            exit_codes::FAILURES
        } else {
            exit_codes::SUCCESS
        })
    }
}

fn print_pretty(result: &ReleaseResult) {
    println!();
    for (name, stage) in result.stages() {
        let (mark, note) = match stage {
            StageOutcome::NotAttempted => (style("○").yellow(), style("not attempted").dim()),
            StageOutcome::Succeeded => (style("✓").green(), style("succeeded").green()),
            StageOutcome::Failed { .. } => (style("✗").red(), style("failed").red()),
        };
        println!("  {mark} {:<8} {note}", style(name).bold());

        if let Some(error) = stage.error() {
            for line in error.lines().take(5) {
                println!("      {}", style(line).red().dim());
            }
        }
    }

    println!();
    if result.is_complete() {
        println!(
            "  {} {}",
            style("✓").green().bold(),
            style(result.summary()).green()
        );
    } else {
        println!("  {} {}", style("✗").red().bold(), style(result.summary()).red());
    }
    println!();
}
