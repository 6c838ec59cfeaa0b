//! Architecture tag resolution for archive names.
//!
//! Visual Studio lays builds out as `bin/<arch>/<config>/<tfm>`, so when no
//! tag is given explicitly it is read from the name of the output
//! directory's grandparent.

use camino::Utf8Path;
use std::fmt;

/// Tag used when the layout does not reveal an architecture.
pub const UNKNOWN_ARCH: &str = "unknown";

/// How an [`ArchTag`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchSource {
    /// Supplied on the command line.
    Override,
    /// Read from the build output path.
    Inferred,
    /// Neither available; [`UNKNOWN_ARCH`] was used.
    Fallback,
}

/// Short architecture identifier embedded in the archive filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchTag {
    value: String,
    source: ArchSource,
}

impl ArchTag {
    /// Resolve the tag for `output_dir`, preferring `override_tag` verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use ds4windows_packager::arch::ArchTag;
    ///
    /// let out = Utf8Path::new("/build/x64/net8/out");
    /// assert_eq!(ArchTag::resolve(out, None).as_str(), "x64");
    /// assert_eq!(ArchTag::resolve(out, Some("arm64")).as_str(), "arm64");
    /// assert_eq!(ArchTag::resolve(Utf8Path::new("/out"), None).as_str(), "unknown");
    /// ```
    #[must_use]
    pub fn resolve(output_dir: &Utf8Path, override_tag: Option<&str>) -> Self {
        if let Some(tag) = override_tag {
            return Self {
                value: tag.to_owned(),
                source: ArchSource::Override,
            };
        }

        match infer_from_layout(output_dir) {
            Some(name) => Self {
                value: name.to_owned(),
                source: ArchSource::Inferred,
            },
            None => Self {
                value: UNKNOWN_ARCH.to_owned(),
                source: ArchSource::Fallback,
            },
        }
    }

    /// Get the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Return how the tag was obtained.
    #[must_use]
    pub const fn source(&self) -> ArchSource {
        self.source
    }
}

impl fmt::Display for ArchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Name of the grandparent of `output_dir`, if it has one.
fn infer_from_layout(output_dir: &Utf8Path) -> Option<&str> {
    output_dir
        .parent()
        .and_then(Utf8Path::parent)
        .and_then(Utf8Path::file_name)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::visual_studio_layout("/repo/bin/x64/Release/net8.0-windows", "x64")]
    #[case::x86_layout("C:/build/x86/Release/net8.0-windows", "x86")]
    #[case::relative_layout("bin/arm64/Release/out", "arm64")]
    #[case::short_relative("x64/net8/out", "x64")]
    fn infers_grandparent_name(#[case] output: &str, #[case] expected: &str) {
        let tag = ArchTag::resolve(Utf8Path::new(output), None);
        assert_eq!(tag.as_str(), expected);
        assert_eq!(tag.source(), ArchSource::Inferred);
    }

    #[rstest]
    #[case::root_child("/out")]
    #[case::one_level("/net8/out")]
    #[case::bare_relative("out")]
    #[case::relative_child("net8/out")]
    fn falls_back_to_unknown(#[case] output: &str) {
        let tag = ArchTag::resolve(Utf8Path::new(output), None);
        assert_eq!(tag.as_str(), UNKNOWN_ARCH);
        assert_eq!(tag.source(), ArchSource::Fallback);
    }

    #[test]
    fn override_is_used_verbatim() {
        let tag = ArchTag::resolve(Utf8Path::new("/build/x64/net8/out"), Some("ARM 64"));
        assert_eq!(tag.to_string(), "ARM 64");
        assert_eq!(tag.source(), ArchSource::Override);
    }
}
