//! Vulcain CLI - Project scaffolding from manifest-driven templates

mod clipboard;
mod commands;
mod git;
mod workflow;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{apply::ApplyArgs, clone::CloneArgs, init::InitArgs};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "vulcain")]
#[command(about = "CLI for scaffolding Vulcain projects from templates")]
#[command(version)]
pub struct Args {
    /// Never execute manifest scripts (for test workflows)
    #[arg(long, global = true, env = "USE_MOCK")]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new project from a template (outside the Vulcain platform)
    Init(InitArgs),
    /// Clone an existing project and run its `clone` scripts
    Clone(CloneArgs),
    /// Apply the template manifest of an already cloned project
    Apply(ApplyArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let settings = vulcain_core::Settings::from_env().with_mock(args.mock);

    let result = match args.command {
        Command::Init(init_args) => commands::init::run(init_args, &settings).await,
        Command::Clone(clone_args) => commands::clone::run(clone_args, &settings).await,
        Command::Apply(apply_args) => commands::apply::run(apply_args, &settings).await,
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
