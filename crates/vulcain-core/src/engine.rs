//! The manifest engine bound to one workflow

use std::io::Write;

use crate::config::{Settings, DEFAULT_STEP};
use crate::context::WorkflowContext;
use crate::error::{EngineError, Result};
use crate::messages::write_messages;
use crate::runtime::{
    run_commands, select_commands, Platform, ScriptExecutor, ScriptReport, SystemShell,
};
use crate::templates::{FileTransformer, Manifest, ManifestCache, TransformReport};

/// Applies the manifest of a cloned project.
///
/// The manifest is read lazily on first use and cached for the lifetime of
/// the engine. Operations never touch the network or version control.
pub struct Engine<E = SystemShell> {
    context: WorkflowContext,
    manifest: ManifestCache,
    platform: Platform,
    mock: bool,
    executor: E,
}

impl Engine<SystemShell> {
    pub fn new(context: WorkflowContext, settings: &Settings) -> Self {
        let platform = Platform::current();
        Self {
            manifest: ManifestCache::new(context.folder()),
            context,
            platform,
            mock: settings.mock,
            executor: SystemShell::new(platform),
        }
    }
}

impl<E: ScriptExecutor> Engine<E> {
    /// Replace the executor used for manifest scripts
    pub fn with_executor<F: ScriptExecutor>(self, executor: F) -> Engine<F> {
        Engine {
            context: self.context,
            manifest: self.manifest,
            platform: self.platform,
            mock: self.mock,
            executor,
        }
    }

    /// Choose the platform for bucket selection and the attributes pass.
    ///
    /// The executor keeps whatever shell it was created with.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn context(&self) -> &WorkflowContext {
        &self.context
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_mock(&self) -> bool {
        self.mock
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The project manifest, `None` when the template ships without one.
    ///
    /// A parse failure is returned once; afterwards the manifest behaves as
    /// empty.
    pub fn read_manifest(&self) -> Result<Option<&Manifest>> {
        self.manifest.read()
    }

    /// Apply the replace, rename and attributes rules, in that order
    pub async fn transform(&self) -> Result<TransformReport> {
        let Some(manifest) = self.manifest.read()? else {
            return Ok(TransformReport::default());
        };

        tracing::debug!("Transforming {}", self.context.folder().display());
        FileTransformer::new(self.context.folder(), self.context.meta(), self.platform)
            .apply(&manifest.transform)
            .await
    }

    /// Run the scripts declared for `step` (`install` when `None`).
    ///
    /// Does nothing in mock mode. Failing commands are reported as warnings
    /// and never stop the remaining ones.
    pub async fn exec_scripts(&mut self, step: Option<&str>) -> Result<ScriptReport> {
        if self.mock {
            tracing::debug!("Mock mode, skipping scripts");
            return Ok(ScriptReport::default());
        }

        let step = step.unwrap_or(DEFAULT_STEP);
        let Some(manifest) = self.manifest.read()? else {
            return Ok(ScriptReport::default());
        };
        let Some((bucket, commands)) = select_commands(&manifest.scripts, self.platform, step)
        else {
            tracing::debug!("No '{}' scripts for {}", step, self.platform);
            return Ok(ScriptReport::default());
        };

        let mut report = run_commands(&mut self.executor, commands, self.context.folder()).await;
        report.bucket = Some(bucket.to_string());
        Ok(report)
    }

    /// Print the messages declared for `step` to stdout
    pub fn display_message(&self, step: &str) -> Result<()> {
        self.write_message(step, &mut std::io::stdout().lock())
    }

    /// Write the messages declared for `step` to `out`
    pub fn write_message<W: Write>(&self, step: &str, out: &mut W) -> Result<()> {
        let Some(manifest) = self.manifest.read()? else {
            return Ok(());
        };
        write_messages(manifest, step, out).map_err(EngineError::Output)
    }
}
