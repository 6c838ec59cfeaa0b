//! Archive naming for release builds.
//!
//! Archives are named `<product>_<version>_<arch>.zip`, for example
//! `DS4Windows_3.10.0_x64.zip`. The version is embedded verbatim.

use crate::arch::ArchTag;
use std::fmt;

/// The fixed file extension for release archives.
const ARCHIVE_EXTENSION: &str = ".zip";

/// A fully-qualified release archive name.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use ds4windows_packager::arch::ArchTag;
/// use ds4windows_packager::naming::ArchiveName;
///
/// let arch = ArchTag::resolve(Utf8Path::new("/build/x64/net8/out"), None);
/// let name = ArchiveName::new("DS4Windows", "3.10.0", arch);
/// assert_eq!(name.base_name(), "DS4Windows_3.10.0_x64");
/// assert_eq!(name.to_string(), "DS4Windows_3.10.0_x64.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    product: String,
    version: String,
    arch: ArchTag,
}

impl ArchiveName {
    /// Create an archive name from its components.
    #[must_use]
    pub fn new(product: impl Into<String>, version: impl Into<String>, arch: ArchTag) -> Self {
        Self {
            product: product.into(),
            version: version.into(),
            arch,
        }
    }

    /// Return the architecture component.
    #[must_use]
    pub fn arch(&self) -> &ArchTag {
        &self.arch
    }

    /// Return the name without the `.zip` extension.
    #[must_use]
    pub fn base_name(&self) -> String {
        format!("{}_{}_{}", self.product, self.version, self.arch)
    }

    /// Return the filename as a string without consuming the value.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ARCHIVE_EXTENSION}", self.base_name())
    }
}
