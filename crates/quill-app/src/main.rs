use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use quill_config::{Backend, Config};
use quill_desktop::{Controller, DesktopError};
use quill_posts::{PostSource, PostsClient};

use self::runner::{BatchSettings, RunOutcome, RunReport};
use self::workflow::recovery::PromptRecovery;

mod logging;
mod profile;
mod runner;
mod workflow;

#[cfg(test)]
mod tests;

/// Exit code when the operator cancels from a prompt
const EXIT_ABORTED: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "quill", version, about = "Types posts into a text editor and saves each one")]
struct Cli {
    /// JSON profile to load instead of the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Automation backend: desktop or dry-run
    #[arg(long)]
    backend: Option<Backend>,

    /// Number of posts to fetch
    #[arg(long)]
    limit: Option<usize>,

    /// Screenshot the dry-run backend matches against
    #[arg(long)]
    screenshot: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Print the effective config and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let config = match profile::load_config(cli.config.as_deref()) {
        Ok(config) => apply_cli(config, &cli),
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    if cli.print_config {
        return match profile::render_config(&config) {
            Ok(rendered) => {
                println!("{rendered}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{e:#}");
                ExitCode::FAILURE
            }
        };
    }

    let client = match PostsClient::new(
        config.api.url.clone(),
        Duration::from_secs(config.api.timeout_seconds),
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run_batch(&client, config, quill_desktop::controller_for).await {
        Ok(report) => {
            tracing::info!("Saved {} file(s)", report.saved.len());
            match report.outcome {
                RunOutcome::Completed => ExitCode::SUCCESS,
                RunOutcome::Aborted => ExitCode::from(EXIT_ABORTED),
                RunOutcome::Failed(_) => ExitCode::FAILURE,
            }
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn apply_cli(mut config: Config, cli: &Cli) -> Config {
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(limit) = cli.limit {
        config.api.limit = limit;
    }
    if let Some(screenshot) = &cli.screenshot {
        config.dry_run.screenshot = Some(screenshot.clone());
    }
    config
}

/// Fetch posts, then drive the editor on a blocking thread.
///
/// `make_controller` runs on that thread, so backends that are not `Send`
/// never cross threads.
pub async fn run_batch<S, F>(source: &S, config: Config, make_controller: F) -> anyhow::Result<RunReport>
where
    S: PostSource + ?Sized,
    F: FnOnce(&Config) -> Result<Box<dyn Controller>, DesktopError> + Send + 'static,
{
    let posts = source.fetch_posts(config.api.limit).await?;
    if posts.is_empty() {
        tracing::info!("No posts to process");
        return Ok(RunReport::empty());
    }
    tracing::info!("Fetched {} post(s)", posts.len());

    tokio::task::spawn_blocking(move || -> anyhow::Result<RunReport> {
        let mut controller = make_controller(&config)?;
        let settings = BatchSettings::from_config(&config);
        let mut recovery = PromptRecovery::from_config(&config);
        Ok(runner::execute(controller.as_mut(), &settings, &mut recovery, &posts))
    })
    .await
    .context("Automation task panicked")?
}
