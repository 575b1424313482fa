//! Module for running `vswhere.exe`, the tool that lists the
//! Visual Studio installations of the machine.
use std::{
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
    process::Command,
};

/// Type for finding and running the vswhere executable.
pub struct VsWhere {
    path: PathBuf,
}

impl VsWhere {
    const DEFAULT_PATH: &'static str =
        "C:\\Program Files (x86)\\Microsoft Visual Studio\\Installer\\vswhere.exe";
    const ENV_KEY: &'static str = "VS_WHERE_PATH";
    /// Lists every product, including build tools only installations,
    /// as json.
    const DEFAULT_ARGS: [&'static str; 6] = [
        "-legacy",
        "-prerelease",
        "-format",
        "json",
        "-products",
        "*",
    ];

    /// Locates vswhere, honouring the `VS_WHERE_PATH` environment variable.
    pub fn find_vswhere() -> std::io::Result<Self> {
        Self::from_path(Self::vswhere_path())
    }

    /// Uses the vswhere executable at `path`.
    pub fn from_path(path: PathBuf) -> std::io::Result<Self> {
        if path.is_file() {
            Ok(VsWhere { path })
        } else {
            Err(Error::new(
                ErrorKind::NotFound,
                format!("vswhere was not found at [{}].", path.display()),
            ))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs vswhere with `args`, or with json listing arguments if `None`,
    /// and returns what it printed.
    pub fn run(&self, args: Option<&[&str]>) -> std::io::Result<String> {
        let output = Command::new(&self.path)
            .args(args.unwrap_or(&Self::DEFAULT_ARGS))
            .output()?;
        if !output.status.success() {
            return Err(Error::new(
                ErrorKind::Other,
                format!("vswhere exited with [{}].", output.status),
            ));
        }
        String::from_utf8(output.stdout).map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!("vswhere output is not valid UTF-8 ({}).", e),
            )
        })
    }

    fn vswhere_path() -> PathBuf {
        std::env::var_os(Self::ENV_KEY)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PATH))
    }
}
