use std::time::Duration;

use quill_config::Config;
use quill_desktop::{CleanupReport, Controller};
use quill_posts::DocumentTemplate;
use quill_types::Post;

use crate::workflow::launch;
use crate::workflow::recovery::PromptRecovery;
use crate::workflow::save;
use crate::workflow::{SaveSettings, WorkflowError};

/// Per-run settings for the batch loop
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub program: String,
    pub args: Vec<String>,
    /// Relaunch attempts the operator may ask for
    pub launch_retries: u32,
    pub typing_interval: Duration,
    pub typing_settle: Duration,
    pub template: DocumentTemplate,
    pub save: SaveSettings,
}

impl BatchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            program: config.editor.program.clone(),
            args: config.editor.args.clone(),
            launch_retries: config.recovery.max_retries,
            typing_interval: config.input.typing_interval(),
            typing_settle: config.editor.typing_settle(),
            template: DocumentTemplate::new(
                config.output.filename_template.clone(),
                config.output.content_template.clone(),
            ),
            save: SaveSettings::from_config(config),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Aborted,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// File names saved, in order
    pub saved: Vec<String>,
    pub outcome: RunOutcome,
    pub cleanup: CleanupReport,
}

impl RunReport {
    pub fn empty() -> Self {
        Self {
            saved: Vec::new(),
            outcome: RunOutcome::Completed,
            cleanup: CleanupReport::default(),
        }
    }
}

/// Type and save every post, stopping at the first error.
///
/// Cleanup runs on every path out, including operator cancel.
pub fn execute<C>(
    controller: &mut C,
    settings: &BatchSettings,
    recovery: &mut PromptRecovery,
    posts: &[Post],
) -> RunReport
where
    C: Controller + ?Sized,
{
    let mut saved = Vec::with_capacity(posts.len());

    let mut outcome = RunOutcome::Completed;
    for post in posts {
        match process_post(controller, settings, recovery, post) {
            Ok(filename) => saved.push(filename),
            Err(WorkflowError::Aborted) => {
                tracing::info!("User aborted.");
                outcome = RunOutcome::Aborted;
                break;
            }
            Err(e) => {
                let e = anyhow::Error::from(e);
                tracing::error!("An error occurred: {e:#}");
                outcome = RunOutcome::Failed(format!("{e:#}"));
                break;
            }
        }
    }

    let cleanup = controller.cleanup();
    if cleanup.attempted() > 0 {
        tracing::info!(
            "Cleanup: {} terminated, {} already exited, {} failed",
            cleanup.terminated,
            cleanup.already_exited,
            cleanup.failed
        );
    }

    RunReport {
        saved,
        outcome,
        cleanup,
    }
}

fn process_post<C>(
    controller: &mut C,
    settings: &BatchSettings,
    recovery: &mut PromptRecovery,
    post: &Post,
) -> Result<String, WorkflowError>
where
    C: Controller + ?Sized,
{
    let filename = settings.template.format_filename(post);
    let content = settings.template.format_content(post);
    tracing::info!("Processing post {} into `{filename}`", post.id);

    let handle = launch::open_editor(
        controller,
        &settings.program,
        &settings.args,
        settings.launch_retries,
    )?;
    controller.kb_type(&content, settings.typing_interval)?;
    controller.sleep(settings.typing_settle);

    let report = recovery.save(controller, |ctrl| {
        save::save_as(ctrl, &settings.save, &filename)
    })?;
    if let Some(badge) = &report.ignored {
        let watching: Vec<&str> = recovery.registry().enabled().collect();
        tracing::info!("`{badge}` ignored, still watching {watching:?}");
    }
    if report.retries > 0 {
        tracing::debug!("`{filename}` saved after {} retries", report.retries);
    }

    controller.close_app(handle)?;
    Ok(filename)
}
