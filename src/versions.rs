//! Module containing code that handles versions.
use lenient_semver::Version;
use std::{
    convert::TryFrom,
    io::{Error, ErrorKind},
};

/// Type used for specifying the version of the installation.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct VsInstallationVersion<'a>(Version<'a>);

impl<'a> VsInstallationVersion<'a> {
    /// Parses the VsInstallationVersion from a string.
    pub fn parse(value: &'a str) -> std::io::Result<VsInstallationVersion<'a>> {
        Version::parse(value).map_or_else(
            |e| {
                Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("Failed to parse &str as a VsInstallationVersion: {}", e),
                ))
            },
            |v| Ok(VsInstallationVersion(v)),
        )
    }

    /// Crate function for checking if the version is in the specified range.
    pub(crate) fn is_in_range(
        &self,
        max: Option<&VsInstallationVersion>,
        min: Option<&VsInstallationVersion>,
    ) -> bool {
        let is_below_max = max.map_or(true, |max_version| max_version.0 > self.0);
        let is_above_min = min.map_or(true, |min_version| self.0 >= min_version.0);
        is_below_max && is_above_min
    }
}

/// Enum holding the VS product line versions.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VsProductLineVersion {
    Vs2022,
    Vs2019,
    Vs2017,
}

impl VsProductLineVersion {
    /// The non inclusive max installation version for a
    /// specific product line version.
    pub fn installation_version_max(&self) -> VsInstallationVersion<'static> {
        Self::constant(match self {
            Self::Vs2022 => "18.0.0.0",
            Self::Vs2019 => "17.0.0.0",
            Self::Vs2017 => "16.0.0.0",
        })
    }

    /// The inclusive min installation version for a
    /// specific product line version.
    pub fn installation_version_min(&self) -> VsInstallationVersion<'static> {
        Self::constant(match self {
            Self::Vs2022 => "17.0.0.0",
            Self::Vs2019 => "16.0.0.0",
            Self::Vs2017 => "15.0.0.0",
        })
    }

    /// The product line whose msbuild reports `tools_version` as its
    /// own numbered toolset.
    ///
    /// Starting with VS2019 msbuild reports the toolset `Current`
    /// instead of a number, so only VS2017 (`15.0`) has a mapping.
    pub fn from_tools_version(tools_version: &str) -> Option<Self> {
        Version::parse(tools_version)
            .ok()
            .and_then(|v| match v.major {
                15 => Some(Self::Vs2017),
                _ => None,
            })
    }

    fn constant(value: &'static str) -> VsInstallationVersion<'static> {
        // Constant values that are always safe to parse.
        VsInstallationVersion::parse(value).unwrap()
    }
}

impl TryFrom<&str> for VsProductLineVersion {
    type Error = Error;

    fn try_from(s: &str) -> std::io::Result<Self> {
        match s {
            "2017" => Ok(VsProductLineVersion::Vs2017),
            "2019" => Ok(VsProductLineVersion::Vs2019),
            "2022" => Ok(VsProductLineVersion::Vs2022),
            _ => Err(Error::new(
                ErrorKind::InvalidData,
                format!("Product line version {} did not match any known values.", s),
            )),
        }
    }
}
