//! Module for selecting a Visual Studio installation, or a build tools
//! installation, from the instances reported by vswhere.
use crate::{versions::VsInstallationVersion, vs_where::VsWhere};
use serde_json::Value;
use std::{
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

/// An installation of Visual Studio or the VS build tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsInstallation {
    path: PathBuf,
}

impl VsInstallation {
    const ENV_KEY: &'static str = "VS_INSTALLATION_PATH";

    /// The root directory of the installation.
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Finds the installation with the highest version between
    /// max (exclusive) and min (inclusive).
    ///
    /// If `VS_INSTALLATION_PATH` is set, the installation at that
    /// path is selected instead, provided it is in the range.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use msbuild_toolsversion::{VsInstallation, VsProductLineVersion};
    ///
    /// let vs2019 = VsProductLineVersion::Vs2019;
    /// let installation = VsInstallation::find_in_range(
    ///     Some(vs2019.installation_version_max()),
    ///     Some(vs2019.installation_version_min()),
    /// );
    /// ```
    pub fn find_in_range(
        max: Option<VsInstallationVersion>,
        min: Option<VsInstallationVersion>,
    ) -> std::io::Result<Self> {
        let output = VsWhere::find_vswhere()?.run(None)?;
        let requested = std::env::var_os(Self::ENV_KEY).map(PathBuf::from);
        Self::select(&output, max.as_ref(), min.as_ref(), requested.as_deref())
    }

    /// Selects an installation from the json printed by vswhere.
    pub(crate) fn select(
        vswhere_output: &str,
        max: Option<&VsInstallationVersion>,
        min: Option<&VsInstallationVersion>,
        requested: Option<&Path>,
    ) -> std::io::Result<Self> {
        let json: Value = serde_json::from_str(vswhere_output).map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!("vswhere output is not valid json ({})", e),
            )
        })?;
        let instances = json.as_array().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidData,
                "vswhere output did not contain a list of instances.",
            )
        })?;
        let candidates = Self::candidates(instances, max, min);

        let selected = match requested {
            Some(requested) => candidates
                .into_iter()
                .find(|(_, path)| requested.starts_with(path)),
            None => candidates.into_iter().max_by(|(a, _), (b, _)| a.cmp(b)),
        };
        selected
            .map(|(_, path)| VsInstallation {
                path: path.to_path_buf(),
            })
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    "No Visual Studio installation matched the requirements.",
                )
            })
    }

    /// The instances with a version in the range. Instances that
    /// cannot be parsed are skipped.
    fn candidates<'a>(
        instances: &'a [Value],
        max: Option<&VsInstallationVersion>,
        min: Option<&VsInstallationVersion>,
    ) -> Vec<(VsInstallationVersion<'a>, &'a Path)> {
        instances
            .iter()
            .filter_map(|instance| match Self::parse_instance(instance) {
                Ok((version, path)) if version.is_in_range(max, min) => Some((version, path)),
                Ok((version, path)) => {
                    tracing::trace!(?version, path = %path.display(), "installation out of range");
                    None
                }
                Err(e) => {
                    tracing::warn!("Skipping vswhere instance: {}", e);
                    None
                }
            })
            .collect()
    }

    fn parse_instance(instance: &Value) -> std::io::Result<(VsInstallationVersion<'_>, &Path)> {
        let field = |name: &str| {
            instance.get(name).and_then(Value::as_str).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Failed to retrieve `{}`.", name),
                )
            })
        };
        let version = VsInstallationVersion::parse(field("installationVersion")?)?;
        let path = Path::new(field("installationPath")?);
        Ok((version, path))
    }
}

impl From<PathBuf> for VsInstallation {
    fn from(path: PathBuf) -> Self {
        VsInstallation { path }
    }
}
