//! `vulcain init`: clone a template and turn it into a project

use anyhow::Result;
use clap::Args;
use vulcain_core::{Engine, Settings, WorkflowContext, END_STEP};

use crate::clipboard::SystemClipboard;
use crate::git;
use crate::workflow::{self, ProjectArgs};

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Template repository to clone
    #[arg(short, long)]
    pub template: Option<String>,

    /// Shallow clone depth
    #[arg(long)]
    pub depth: Option<u32>,
}

pub async fn run(args: InitArgs, settings: &Settings) -> Result<()> {
    cliclack::intro(format!("Vulcain {}", crate::CLI_VERSION))?;

    let info = args.project.project_info()?;
    let base = args.project.base_folder()?;
    workflow::prepare_base_folder(&base)?;

    let context = WorkflowContext::new(&info, Some(&base), settings, &SystemClipboard);
    let folder = context.folder().to_path_buf();
    let full_name = context.meta().project.full_name.clone();

    let template = args
        .template
        .or(info.template)
        .unwrap_or_else(|| git::DEFAULT_TEMPLATE.to_string());

    let spinner = cliclack::spinner();
    spinner.start(format!("Cloning repository into {}...", folder.display()));
    if let Err(e) = git::clone(&template, &folder, args.depth) {
        spinner.stop("Clone failed");
        cliclack::log::error(format!("{:#}", e))?;
        anyhow::bail!("Project initialization aborted.");
    }
    spinner.stop(format!("Cloned {}", template));

    let mut engine = Engine::new(context, settings);

    cliclack::log::step("Processing manifest - updating source files...")?;
    match engine.transform().await {
        Ok(report) => workflow::print_warnings(&report.warnings)?,
        Err(e) => {
            cliclack::log::error(format!("Error when updating source files - {}", e))?;
            workflow::remove_folder(&folder)?;
            anyhow::bail!("Project initialization aborted.");
        }
    }

    if engine.is_mock() {
        cliclack::log::info("Mock mode, scripts are not executed")?;
    }
    // Script failures are never fatal
    match engine.exec_scripts(None).await {
        Ok(report) => workflow::print_warnings(&report.warnings)?,
        Err(e) => cliclack::log::warning(format!("Error when running scripts: {}", e))?,
    }

    cliclack::log::success(format!(
        "Project {} initialized successfully in {}",
        full_name,
        folder.display()
    ))?;

    if let Err(e) = engine.display_message(END_STEP) {
        tracing::warn!("Cannot display messages: {}", e);
    }

    cliclack::outro("Happy coding!")?;
    Ok(())
}
