//! `vulcain apply`: run the manifest of a project that is already on disk

use anyhow::Result;
use clap::Args;
use vulcain_core::{Engine, Settings, WorkflowContext, MANIFEST_FILE_NAME};

use crate::clipboard::SystemClipboard;
use crate::workflow::{self, ProjectArgs};

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Lifecycle step whose scripts are run (defaults to install)
    #[arg(long)]
    pub step: Option<String>,

    /// Lifecycle step whose messages are shown afterwards
    #[arg(long)]
    pub message: Option<String>,

    /// Only transform files, do not run scripts
    #[arg(long)]
    pub skip_scripts: bool,

    /// Only run scripts, leave the files untouched
    #[arg(long, conflicts_with = "skip_scripts")]
    pub skip_transform: bool,
}

pub async fn run(args: ApplyArgs, settings: &Settings) -> Result<()> {
    cliclack::intro(format!("Vulcain {}", crate::CLI_VERSION))?;

    let info = args.project.project_info()?;
    let base = args.project.base_folder()?;
    let context = WorkflowContext::new(&info, Some(&base), settings, &SystemClipboard);

    if !context.folder().is_dir() {
        anyhow::bail!("Project folder not found: {}", context.folder().display());
    }
    if !context.folder().join(MANIFEST_FILE_NAME).exists() {
        cliclack::log::info(format!("No {} found, nothing to transform", MANIFEST_FILE_NAME))?;
    }

    let mut engine = Engine::new(context, settings);

    if args.skip_transform {
        cliclack::log::info("Skipping transformation")?;
    } else {
        let report = engine.transform().await?;
        workflow::print_warnings(&report.warnings)?;
        cliclack::log::success(format!(
            "Rendered {} file(s), renamed {}, updated mode of {}",
            report.rendered.len(),
            report.renamed.len(),
            report.chmodded.len()
        ))?;
    }

    if args.skip_scripts {
        cliclack::log::info("Skipping scripts")?;
    } else if engine.is_mock() {
        cliclack::log::info("Mock mode, scripts are not executed")?;
    } else {
        let scripts = engine.exec_scripts(args.step.as_deref()).await?;
        workflow::print_warnings(&scripts.warnings)?;
    }

    if let Some(step) = &args.message {
        engine.display_message(step)?;
    }

    cliclack::outro("Done")?;
    Ok(())
}
