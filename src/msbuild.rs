//! Module for finding msbuild and running it with a forced tools version.
//!
//! Unlike the build listener, which has to change the environment of the
//! whole process, the tools version is only given to the msbuild child
//! process here, so nothing needs to be restored afterwards.
use crate::{
    environment::MSBUILD_DEFAULT_TOOLS_VERSION,
    error::Result,
    tools_version::ToolsVersion,
    versions::{VsInstallationVersion, VsProductLineVersion},
    vs_installation::VsInstallation,
};
use std::{
    convert::TryFrom,
    io::{Error, ErrorKind, Write},
    path::{Path, PathBuf},
    process::Command,
};

/// Type for finding and interacting with
/// the msbuild executable.
#[derive(Debug)]
pub struct MsBuild {
    path: PathBuf,
}

impl MsBuild {
    /// Locations of msbuild inside an installation, newest layout first.
    const BIN_PATHS: [&'static str; 2] = [
        "MSBuild/Current/Bin/msbuild.exe",
        "MSBuild/15.0/Bin/msbuild.exe",
    ];

    /// Finds the msbuild executable that is associated with provided product line version
    /// if no version is provided then the latest installation of msbuild that is found
    /// will be selected.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use msbuild_toolsversion::MsBuild;
    ///
    /// let msbuild = MsBuild::find_msbuild(Some("2017"))
    ///     .expect("A 2017 VS installation should exist");
    /// ```
    pub fn find_msbuild(product_line_version: Option<&str>) -> std::io::Result<Self> {
        let product_line = product_line_version
            .map(VsProductLineVersion::try_from)
            .transpose()?;
        MsBuild::find_msbuild_in_range(
            product_line.map(|plv| plv.installation_version_max()),
            product_line.map(|plv| plv.installation_version_min()),
        )
    }

    /// Finds a msbuild with the highest installation version that is in a range
    /// between max (exclusive) and min (inclusive).
    pub fn find_msbuild_in_range(
        max: Option<VsInstallationVersion>,
        min: Option<VsInstallationVersion>,
    ) -> std::io::Result<Self> {
        VsInstallation::find_in_range(max, min)
            .and_then(|vs_installation| Self::try_from(&vs_installation))
    }

    /// Finds a msbuild that ships `tools_version`, or the latest one if
    /// the tools version is unknown or not given.
    pub fn find_for_tools_version(tools_version: Option<&ToolsVersion>) -> std::io::Result<Self> {
        let (max, min) = tools_version
            .map(ToolsVersion::installation_range)
            .unwrap_or((None, None));
        MsBuild::find_msbuild_in_range(max, min)
    }

    /// Uses the msbuild executable at `path`.
    pub fn from_path(path: PathBuf) -> std::io::Result<Self> {
        if !path.is_file() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("No msbuild executable found at {}", path.display()),
            ));
        }
        Ok(MsBuild { path })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Creates the command running msbuild in `project_dir` with `args`.
    /// The tools version, if any, is only set in the environment of
    /// the child process.
    pub fn command(
        &self,
        project_dir: &Path,
        args: &[&str],
        tools_version: Option<&ToolsVersion>,
    ) -> Command {
        let mut command = Command::new(self.path.as_path());
        command.current_dir(project_dir).args(args);
        if let Some(tools_version) = tools_version {
            command.env(MSBUILD_DEFAULT_TOOLS_VERSION, tools_version.as_str());
        }
        command
    }

    /// Executes msbuild using the provided project_dir and
    /// the provided arguments.
    pub fn run(
        &self,
        project_dir: &Path,
        args: &[&str],
        tools_version: Option<&ToolsVersion>,
    ) -> std::io::Result<()> {
        if !self.path.as_path().exists() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("Could not find [{}].", self.path.to_string_lossy()),
            ));
        }
        let out = self.command(project_dir, args, tools_version).output()?;
        if out.status.success() {
            return Ok(());
        }
        std::io::stdout().write_all(&out.stdout)?;
        let error_message = match out.status.code() {
            Some(code) => format!("Failed to run msbuild: Exit code [{code}]"),
            None => "Failed to run msbuild".to_string(),
        };
        Err(Error::new(ErrorKind::Other, error_message))
    }

    /// Builds the solution in `solution_dir`, forcing the tools version
    /// from its `.toolsversion` file if there is one.
    pub fn build_solution(&self, solution_dir: &Path, args: &[&str]) -> Result<()> {
        let tools_version = ToolsVersion::load(solution_dir)?;
        if let Some(tools_version) = &tools_version {
            tracing::info!(
                "Setting {} to {} for [{}]",
                MSBUILD_DEFAULT_TOOLS_VERSION,
                tools_version,
                solution_dir.display()
            );
        }
        self.run(solution_dir, args, tools_version.as_ref())?;
        Ok(())
    }
}

impl TryFrom<&VsInstallation> for MsBuild {
    type Error = Error;

    fn try_from(vs_installation: &VsInstallation) -> std::io::Result<MsBuild> {
        Self::BIN_PATHS
            .iter()
            .map(|bin| vs_installation.path().join(bin))
            .find(|path| path.is_file())
            .map(|path| MsBuild { path })
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    format!(
                        "No msbuild executable found in {}",
                        vs_installation.path().display()
                    ),
                )
            })
    }
}
