//! `vulcain clone`: fetch an existing project and run its `clone` scripts

use anyhow::Result;
use clap::Args;
use vulcain_core::{Engine, Settings, WorkflowContext, CLONE_STEP};

use crate::clipboard::SystemClipboard;
use crate::git;
use crate::workflow::{self, ProjectArgs};

#[derive(Args, Debug, Clone)]
pub struct CloneArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Repository of the project
    #[arg(short, long)]
    pub url: String,

    /// Shallow clone depth
    #[arg(long)]
    pub depth: Option<u32>,
}

pub async fn run(args: CloneArgs, settings: &Settings) -> Result<()> {
    cliclack::intro(format!("Vulcain {}", crate::CLI_VERSION))?;

    let info = args.project.project_info()?;
    let base = args.project.base_folder()?;
    workflow::prepare_base_folder(&base)?;

    let context = WorkflowContext::new(&info, Some(&base), settings, &SystemClipboard);
    let folder = context.folder().to_path_buf();
    let full_name = context.meta().project.full_name.clone();

    let spinner = cliclack::spinner();
    spinner.start(format!("Cloning {} into {}...", args.url, folder.display()));
    if let Err(e) = git::clone(&args.url, &folder, args.depth) {
        spinner.stop("Clone failed");
        cliclack::log::error(format!("{:#}", e))?;
        anyhow::bail!("Project clone aborted.");
    }
    spinner.stop(format!("Cloned {}", args.url));

    // The project is used as is: no transformation
    let mut engine = Engine::new(context, settings);
    if engine.is_mock() {
        cliclack::log::info("Mock mode, scripts are not executed")?;
    }

    match engine.exec_scripts(Some(CLONE_STEP)).await {
        Ok(report) => workflow::print_warnings(&report.warnings)?,
        Err(e) => {
            cliclack::log::error(format!("Error when running clone scripts - {}", e))?;
            workflow::remove_folder(&folder)?;
            anyhow::bail!("Project clone aborted.");
        }
    }

    cliclack::log::success(format!("Project {} cloned successfully.", full_name))?;
    cliclack::outro("Happy coding!")?;
    Ok(())
}
