//! Module for overriding and restoring the process environment variable
//! that msbuild reads its default tools version from.
use crate::tools_version::ToolsVersion;
use std::ffi::{OsStr, OsString};

/// The environment variable msbuild uses as its default tools version.
pub const MSBUILD_DEFAULT_TOOLS_VERSION: &str = "MSBUILDDEFAULTTOOLSVERSION";

/// The value an environment variable had before it was overridden.
///
/// It can only be restored once since [`SavedEnvironment::restore`]
/// consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the saved value must be restored after the build"]
pub struct SavedEnvironment {
    variable: String,
    original: Option<OsString>,
}

/// Sets `variable` to `tools_version` and returns its previous value.
///
/// # Examples
///
/// ```
/// use msbuild_toolsversion::{environment::apply_override, ToolsVersion};
///
/// let tools_version = ToolsVersion::parse("15.0").unwrap();
/// let saved = apply_override("DOCTEST_TOOLS_VERSION", &tools_version);
/// assert_eq!(std::env::var("DOCTEST_TOOLS_VERSION").unwrap(), "15.0");
///
/// saved.restore();
/// assert!(std::env::var_os("DOCTEST_TOOLS_VERSION").is_none());
/// ```
pub fn apply_override(variable: &str, tools_version: &ToolsVersion) -> SavedEnvironment {
    let saved = SavedEnvironment::capture(variable);
    set(variable, tools_version);
    saved
}

/// Sets `variable` to `tools_version` without capturing its previous value.
pub fn set(variable: &str, tools_version: &ToolsVersion) {
    std::env::set_var(variable, tools_version.as_str());
    tracing::debug!(variable, tools_version = %tools_version, "environment variable overridden");
}

impl SavedEnvironment {
    /// Captures the current value of `variable` without changing it.
    pub fn capture(variable: &str) -> Self {
        SavedEnvironment {
            variable: variable.to_string(),
            original: std::env::var_os(variable),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The captured value, `None` if the variable was unset.
    pub fn original(&self) -> Option<&OsStr> {
        self.original.as_deref()
    }

    /// Writes the captured value back. A variable that was unset, or set
    /// to an empty value, is removed. Returns the restored value, `None`
    /// if the variable is now unset.
    pub fn restore(self) -> Option<OsString> {
        let restored = self.original.filter(|value| !value.is_empty());
        match &restored {
            Some(value) => std::env::set_var(&self.variable, value),
            None => std::env::remove_var(&self.variable),
        }
        tracing::debug!(
            variable = %self.variable,
            restored = ?restored,
            "environment variable restored"
        );
        restored
    }
}

// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Unit tests of the private functions and methods
// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod test {
    use super::*;

    // Every test uses its own variable so they can run in parallel.

    #[test]
    fn test_apply_and_restore_unset_variable() {
        const VARIABLE: &str = "MSBUILD_TOOLSVERSION_TEST_UNSET";
        std::env::remove_var(VARIABLE);

        let tools_version = ToolsVersion::parse("15.0").unwrap();
        let saved = apply_override(VARIABLE, &tools_version);
        assert_eq!(saved.original(), None);
        assert_eq!(std::env::var(VARIABLE).as_deref(), Ok("15.0"));

        assert_eq!(saved.restore(), None);
        assert_eq!(std::env::var_os(VARIABLE), None, "The variable should be unset again.");
    }

    #[test]
    fn test_apply_and_restore_set_variable() {
        const VARIABLE: &str = "MSBUILD_TOOLSVERSION_TEST_SET";
        std::env::set_var(VARIABLE, "2.0");

        let tools_version = ToolsVersion::parse("4.0").unwrap();
        let saved = apply_override(VARIABLE, &tools_version);
        assert_eq!(saved.variable(), VARIABLE);
        assert_eq!(saved.original(), Some(OsStr::new("2.0")));
        assert_eq!(std::env::var(VARIABLE).as_deref(), Ok("4.0"));

        assert_eq!(saved.restore(), Some(OsString::from("2.0")));
        assert_eq!(std::env::var(VARIABLE).as_deref(), Ok("2.0"));
        std::env::remove_var(VARIABLE);
    }

    #[test]
    fn test_empty_variable_is_restored_to_unset() {
        const VARIABLE: &str = "MSBUILD_TOOLSVERSION_TEST_EMPTY";
        std::env::set_var(VARIABLE, "");

        let tools_version = ToolsVersion::parse("15.0").unwrap();
        let saved = apply_override(VARIABLE, &tools_version);
        assert_eq!(saved.original(), Some(OsStr::new("")));

        assert_eq!(saved.restore(), None);
        assert_eq!(
            std::env::var_os(VARIABLE),
            None,
            "An empty variable should be removed, not set to an empty value."
        );
    }

    #[test]
    fn test_set_does_not_capture() {
        const VARIABLE: &str = "MSBUILD_TOOLSVERSION_TEST_SET_ONLY";
        std::env::set_var(VARIABLE, "2.0");
        let saved = SavedEnvironment::capture(VARIABLE);

        set(VARIABLE, &ToolsVersion::parse("4.0").unwrap());
        set(VARIABLE, &ToolsVersion::parse("Current").unwrap());
        assert_eq!(std::env::var(VARIABLE).as_deref(), Ok("Current"));

        assert_eq!(saved.restore(), Some(OsString::from("2.0")));
        assert_eq!(std::env::var(VARIABLE).as_deref(), Ok("2.0"));
        std::env::remove_var(VARIABLE);
    }

    #[test]
    fn test_capture_does_not_modify() {
        const VARIABLE: &str = "MSBUILD_TOOLSVERSION_TEST_CAPTURE";
        std::env::set_var(VARIABLE, "12.0");
        let saved = SavedEnvironment::capture(VARIABLE);
        assert_eq!(std::env::var(VARIABLE).as_deref(), Ok("12.0"));
        assert_eq!(saved.restore(), Some(OsString::from("12.0")));
        std::env::remove_var(VARIABLE);
    }
}
