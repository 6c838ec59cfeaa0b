//! Packaging constants and their optional TOML overrides.
//!
//! The defaults reproduce the DS4Windows release layout. A TOML file passed
//! with `--config` may override any subset of keys; unknown keys are rejected
//! so a typo cannot silently fall back to a default.

use crate::error::{PackagerError, Result};
use crate::language::{DEFAULT_LANGUAGES, LanguageCode};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Product name used for the manifest, staging folder and archive prefix.
pub const DEFAULT_PRODUCT_NAME: &str = "DS4Windows";

/// Name of the consolidated localisation directory inside the build output.
pub const DEFAULT_LANG_DIR_NAME: &str = "Lang";

/// Name of the version record written into the project directory.
pub const DEFAULT_VERSION_FILE_NAME: &str = "newest.txt";

/// Location of the dependency-path-injection script, relative to the project
/// directory.
pub const DEFAULT_INJECT_SCRIPT: &str = "../utils/inject_deps_path.py";

/// Configuration for a packaging run.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackagerConfig {
    /// Product name; also the archive's single top-level folder.
    pub product_name: String,
    /// Folder under the build output that receives every language folder.
    pub lang_dir_name: String,
    /// File in the project directory that records the packaged version.
    pub version_file_name: String,
    /// Injection script path, resolved against the project directory.
    pub inject_script: Utf8PathBuf,
    /// Language folders to consolidate.
    pub languages: Vec<LanguageCode>,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            product_name: DEFAULT_PRODUCT_NAME.to_owned(),
            lang_dir_name: DEFAULT_LANG_DIR_NAME.to_owned(),
            version_file_name: DEFAULT_VERSION_FILE_NAME.to_owned(),
            inject_script: Utf8PathBuf::from(DEFAULT_INJECT_SCRIPT),
            languages: DEFAULT_LANGUAGES
                .iter()
                .copied()
                .map(LanguageCode::from)
                .collect(),
        }
    }
}

impl PackagerConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Config`] when the text is not valid TOML or
    /// contains unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use ds4windows_packager::config::PackagerConfig;
    ///
    /// let config = PackagerConfig::from_toml_str(
    ///     "product_name = \"DS4WindowsBeta\"",
    ///     Utf8Path::new("packager.toml"),
    /// )?;
    /// assert_eq!(config.product_name, "DS4WindowsBeta");
    /// assert_eq!(config.lang_dir_name, "Lang");
    /// # Ok::<(), ds4windows_packager::error::PackagerError>(())
    /// ```
    pub fn from_toml_str(contents: &str, origin: &Utf8Path) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PackagerError::Config {
            path: origin.to_owned(),
            reason: e.message().to_owned(),
        })
    }

    /// Load the configuration from `path`, or return the defaults when no
    /// path is given.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Config`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|e| PackagerError::Config {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Name of the dependency manifest inside the build output.
    #[must_use]
    pub fn manifest_file_name(&self) -> String {
        format!("{}.deps.json", self.product_name)
    }
}
