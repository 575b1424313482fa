//! # The msbuild-toolsversion crate
//! This crate forces the msbuild tools version of a solution.
//!
//! The tools version is read from a `.toolsversion` file in the root
//! of the solution. Its trimmed contents, e.g. `15.0`, are put in the
//! `MSBUILDDEFAULTTOOLSVERSION` environment variable for the duration
//! of a build. A missing or empty file means that nothing is forced.
//!
//! There are two ways of using it:
//!
//! - From a build host, e.g. an IDE, through the [`ToolsVersionPackage`]
//!   which advises a [`ToolsVersionListener`] to the build manager of the
//!   host. The listener sets the environment variable of the process when
//!   a build starts and restores it when the build is done or cancelled.
//!
//! - From a build driver, through [`MsBuild::build_solution`], which only
//!   sets the variable for the msbuild child process.
//!
//! # Environment Variables
//! - The `VS_WHERE_PATH` environment variable can be used in order
//!   overwrite the default path where the crate tries to locate
//!   the `vswhere.exe` binary.
//!
//! - The `VS_INSTALLATION_PATH` environment variable can be used in order
//!   to specify a path to a Visual Studio installation.
//!   Note! The path must still lead to an installation that fulfills the version
//!   requirements.
mod versions;

pub mod environment;
pub mod error;
pub mod guard;
pub mod host;
pub mod listener;
pub mod msbuild;
pub mod package;
pub mod tools_version;
pub mod vs_installation;
pub mod vs_where;

pub use environment::{apply_override, SavedEnvironment, MSBUILD_DEFAULT_TOOLS_VERSION};
pub use error::{Error, Result};
pub use listener::{ListenerConfig, ToolsVersionListener};
pub use msbuild::MsBuild;
pub use package::ToolsVersionPackage;
pub use tools_version::ToolsVersion;
pub use versions::{VsInstallationVersion, VsProductLineVersion};
pub use vs_installation::VsInstallation;
pub use vs_where::VsWhere;
