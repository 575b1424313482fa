//! Module for the build listener that forces the tools version
//! for the duration of a solution build.
use crate::{
    environment::{self, SavedEnvironment, MSBUILD_DEFAULT_TOOLS_VERSION},
    error::Result,
    guard,
    host::{ServiceProvider, UpdateOutcome, UpdateSolutionEvents},
    tools_version::ToolsVersion,
};
use std::rc::Rc;

/// Configuration of a [`ToolsVersionListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Name of the file in the solution root holding the tools version.
    pub file_name: String,
    /// The environment variable that receives the tools version.
    pub variable: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        ListenerConfig {
            file_name: ToolsVersion::FILE_NAME.to_string(),
            variable: MSBUILD_DEFAULT_TOOLS_VERSION.to_string(),
        }
    }
}

/// Build listener that sets the tools version environment variable
/// when a build starts and restores it when the build is done or
/// cancelled.
pub struct ToolsVersionListener {
    services: Rc<dyn ServiceProvider>,
    config: ListenerConfig,
    saved: Option<SavedEnvironment>,
}

impl ToolsVersionListener {
    pub fn new(services: Rc<dyn ServiceProvider>, config: ListenerConfig) -> Self {
        ToolsVersionListener {
            services,
            config,
            saved: None,
        }
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    /// True while a value captured at the start of a build waits to be restored.
    pub fn has_pending_restore(&self) -> bool {
        self.saved.is_some()
    }

    /// Loads the tools version of the current solution and, if there is one,
    /// applies it to the environment.
    pub fn apply_override(&mut self) -> Result<()> {
        let tools_version = match self.load_tools_version()? {
            Some(tools_version) => tools_version,
            None => {
                tracing::debug!(file = %self.config.file_name, "no tools version to force");
                return Ok(());
            }
        };

        if self.saved.is_some() {
            // Keep the first capture, it holds the value from before any override.
            tracing::warn!(
                variable = %self.config.variable,
                "build started before the previous one restored the environment"
            );
            environment::set(&self.config.variable, &tools_version);
        } else {
            self.saved = Some(environment::apply_override(
                &self.config.variable,
                &tools_version,
            ));
        }

        self.log(&format!(
            "Setting {} to {}\n",
            self.config.variable, tools_version
        ))
    }

    /// Restores the value captured by the last [`Self::apply_override`].
    /// Does nothing if there is nothing to restore.
    pub fn restore_override(&mut self) -> Result<()> {
        let Some(saved) = self.saved.take() else {
            return Ok(());
        };
        match saved.restore() {
            Some(original) => self.log(&format!(
                "Restoring {} to {}\n",
                self.config.variable,
                original.to_string_lossy()
            )),
            _ => self.log(&format!("Restoring {}\n", self.config.variable)),
        }
    }

    fn load_tools_version(&self) -> Result<Option<ToolsVersion>> {
        let solution = guard::service(self.services.solution(), "SolutionInfo")?;
        let solution_dir = solution.solution_directory()?;
        ToolsVersion::load_from(&solution_dir, &self.config.file_name)
    }

    fn log(&self, text: &str) -> Result<()> {
        let output = guard::service(self.services.output(), "OutputSink")?;
        output.output_string(text)
    }
}

impl UpdateSolutionEvents for ToolsVersionListener {
    fn update_solution_begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn update_solution_done(&mut self, _outcome: UpdateOutcome) -> Result<()> {
        self.restore_override()
    }

    fn update_solution_cancel(&mut self) -> Result<()> {
        self.restore_override()
    }

    fn update_solution_start_update(&mut self) -> Result<()> {
        self.apply_override()
    }
}
