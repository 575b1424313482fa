//! Module for the tools version that is forced upon a solution.
//!
//! The value comes from a plain text file in the solution root
//! whose trimmed contents name the tools version. A missing file,
//! or one that only contains whitespace, means that no tools
//! version should be forced.
//!
//! The file may be UTF-8, with or without a byte order mark, or
//! UTF-16 with a byte order mark, which is what Windows PowerShell
//! writes when redirecting output to a file.
use crate::{
    error::{Error, Result},
    versions::{VsInstallationVersion, VsProductLineVersion},
};
use std::{
    fmt,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

/// A non empty, trimmed tools version such as `15.0` or `Current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsVersion(String);

impl ToolsVersion {
    /// Name of the file in the solution root holding the tools version.
    pub const FILE_NAME: &'static str = ".toolsversion";

    /// The toolset name used by msbuild 16.0 and later.
    const CURRENT: &'static str = "Current";

    /// Creates a tools version from the raw contents of a tools
    /// version file. Returns `None` if nothing remains after trimming.
    pub fn parse(contents: &str) -> Option<Self> {
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(ToolsVersion(trimmed.to_string()))
        }
    }

    /// Loads the tools version from the `.toolsversion` file in `solution_dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use msbuild_toolsversion::ToolsVersion;
    ///
    /// let dir = std::env::temp_dir().join("no-such-solution-directory");
    /// assert_eq!(ToolsVersion::load(&dir).ok(), Some(None));
    /// ```
    pub fn load(solution_dir: &Path) -> Result<Option<Self>> {
        Self::load_from(solution_dir, Self::FILE_NAME)
    }

    /// Loads the tools version from `file_name` in `solution_dir`.
    pub fn load_from(solution_dir: &Path, file_name: &str) -> Result<Option<Self>> {
        let path: PathBuf = solution_dir.join(file_name);
        match std::fs::read(&path).and_then(decode) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Io { path, source }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The range (max exclusive, min inclusive) of VS installation versions
    /// whose msbuild ships this tools version. An unknown tools version
    /// does not constrain the range.
    pub fn installation_range(
        &self,
    ) -> (
        Option<VsInstallationVersion<'static>>,
        Option<VsInstallationVersion<'static>>,
    ) {
        if self.0.eq_ignore_ascii_case(Self::CURRENT) {
            return (
                None,
                Some(VsProductLineVersion::Vs2019.installation_version_min()),
            );
        }
        match VsProductLineVersion::from_tools_version(&self.0) {
            Some(plv) => (
                Some(plv.installation_version_max()),
                Some(plv.installation_version_min()),
            ),
            None => (None, None),
        }
    }
}

/// Decodes the contents of a tools version file, dropping the byte order mark.
fn decode(bytes: Vec<u8>) -> io::Result<String> {
    const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
    const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
    const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        return utf8(rest.to_vec());
    }
    if let Some(rest) = bytes.strip_prefix(&UTF16LE_BOM) {
        return utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&UTF16BE_BOM) {
        return utf16(rest, u16::from_be_bytes);
    }
    utf8(bytes)
}

fn utf8(bytes: Vec<u8>) -> io::Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        io::Error::new(
            ErrorKind::InvalidData,
            format!("Tools version file is not valid UTF-8 ({}).", e),
        )
    })
}

fn utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> io::Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            "Tools version file has an odd number of bytes for UTF-16.",
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| {
        io::Error::new(
            ErrorKind::InvalidData,
            format!("Tools version file is not valid UTF-16 ({}).", e),
        )
    })
}

impl fmt::Display for ToolsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ToolsVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Unit tests of the private functions and methods
// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_trims_contents() {
        let tools_version = ToolsVersion::parse("  4.0  \n").expect("4.0 should be parsed.");
        assert_eq!(tools_version.as_str(), "4.0");
    }

    #[test]
    fn test_parse_whitespace_is_none() {
        assert_eq!(ToolsVersion::parse(""), None);
        assert_eq!(ToolsVersion::parse(" \r\n\t "), None);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().expect("It should be possible to create a temporary directory.");
        let actual = ToolsVersion::load(dir.path())
            .expect("A missing tools version file should not be an error.");
        assert_eq!(actual, None);
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempdir().expect("It should be possible to create a temporary directory.");
        std::fs::write(dir.path().join(".toolsversion"), "15.0\r\n")
            .expect("It should be possible to write the tools version file.");
        let actual = ToolsVersion::load(dir.path())
            .expect("An existing tools version file should be readable.");
        assert_eq!(actual, ToolsVersion::parse("15.0"));
    }

    fn utf16_file(text: &str, bom: [u8; 2], unit: fn(u16) -> [u8; 2]) -> Vec<u8> {
        let mut bytes = bom.to_vec();
        bytes.extend(text.encode_utf16().flat_map(unit));
        bytes
    }

    fn load_bytes(bytes: &[u8]) -> Result<Option<ToolsVersion>> {
        let dir = tempdir().expect("It should be possible to create a temporary directory.");
        std::fs::write(dir.path().join(".toolsversion"), bytes)
            .expect("It should be possible to write the tools version file.");
        ToolsVersion::load(dir.path())
    }

    #[test]
    fn test_load_utf8_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"15.0\r\n");
        let actual = load_bytes(&bytes).expect("A UTF-8 file with a BOM should be readable.");
        assert_eq!(actual, ToolsVersion::parse("15.0"));
        let (_, min) = actual.unwrap().installation_range();
        assert_eq!(
            min,
            Some(VsProductLineVersion::Vs2017.installation_version_min()),
            "The byte order mark should not be part of the tools version."
        );
    }

    #[test]
    fn test_load_utf16_little_endian() {
        // What `echo 15.0 > .toolsversion` writes in Windows PowerShell.
        let bytes = utf16_file("15.0\r\n", [0xFF, 0xFE], u16::to_le_bytes);
        let actual = load_bytes(&bytes).expect("A UTF-16LE file should be readable.");
        assert_eq!(actual, ToolsVersion::parse("15.0"));
    }

    #[test]
    fn test_load_utf16_big_endian() {
        let bytes = utf16_file("  4.0\n", [0xFE, 0xFF], u16::to_be_bytes);
        let actual = load_bytes(&bytes).expect("A UTF-16BE file should be readable.");
        assert_eq!(actual, ToolsVersion::parse("4.0"));
    }

    #[test]
    fn test_load_bom_only_is_none() {
        assert_eq!(load_bytes(&[0xEF, 0xBB, 0xBF]).unwrap(), None);
        assert_eq!(load_bytes(&[0xFF, 0xFE]).unwrap(), None);
    }

    #[test]
    fn test_load_truncated_utf16() {
        assert!(matches!(
            load_bytes(&[0xFF, 0xFE, 0x31]),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_load_unreadable_file() {
        let dir = tempdir().expect("It should be possible to create a temporary directory.");
        // A directory cannot be read as a file.
        std::fs::create_dir(dir.path().join(".toolsversion"))
            .expect("It should be possible to create the directory.");
        assert!(matches!(
            ToolsVersion::load(dir.path()),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_installation_range() {
        let vs2017 = ToolsVersion::parse("15.0").unwrap();
        let (max, min) = vs2017.installation_range();
        assert_eq!(max, Some(VsProductLineVersion::Vs2017.installation_version_max()));
        assert_eq!(min, Some(VsProductLineVersion::Vs2017.installation_version_min()));

        let current = ToolsVersion::parse("Current").unwrap();
        assert_eq!(
            current.installation_range(),
            (None, Some(VsProductLineVersion::Vs2019.installation_version_min()))
        );

        let legacy = ToolsVersion::parse("4.0").unwrap();
        assert_eq!(legacy.installation_range(), (None, None));
    }
}
