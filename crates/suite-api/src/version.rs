//! Suite names, offered versions and version negotiation.

use serde::Serialize;
use suite_core::SuiteError;
use thiserror::Error;

/// Every suite the host can hand to a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SuiteKind {
    Basic,
    ZString,
    ActionDescriptor,
    ActionList,
    ActionReference,
    Handle,
    Buffer,
    ColorSpace,
}

impl SuiteKind {
    /// All suites, in listing order.
    pub const ALL: [SuiteKind; 8] = [
        SuiteKind::Basic,
        SuiteKind::ZString,
        SuiteKind::ActionDescriptor,
        SuiteKind::ActionList,
        SuiteKind::ActionReference,
        SuiteKind::Handle,
        SuiteKind::Buffer,
        SuiteKind::ColorSpace,
    ];

    /// Registered suite name, as passed to `AcquireSuite`.
    pub const fn name(self) -> &'static str {
        match self {
            SuiteKind::Basic => "SP Basic Suite",
            SuiteKind::ZString => "AS ZString Suite",
            SuiteKind::ActionDescriptor => "df135115-c769-11d0-8079-00c04fd7ec47",
            SuiteKind::ActionList => "df135117-c769-11d0-8079-00c04fd7ec47",
            SuiteKind::ActionReference => "df135116-c769-11d0-8079-00c04fd7ec47",
            SuiteKind::Handle => "Photoshop Handle Suite for Plugins",
            SuiteKind::Buffer => "Photoshop Buffer Suite for Plugins",
            SuiteKind::ColorSpace => "Photoshop ColorSpace Suite for Plugins",
        }
    }

    /// Versions the host offers, oldest first.
    pub const fn versions(self) -> &'static [i32] {
        match self {
            SuiteKind::Basic => &[4],
            SuiteKind::ZString => &[1],
            SuiteKind::ActionDescriptor => &[1, 2],
            SuiteKind::ActionList => &[1],
            SuiteKind::ActionReference => &[2],
            SuiteKind::Handle => &[1, 2],
            SuiteKind::Buffer => &[1],
            SuiteKind::ColorSpace => &[1],
        }
    }

    /// Short human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            SuiteKind::Basic => "basic",
            SuiteKind::ZString => "zstring",
            SuiteKind::ActionDescriptor => "action-descriptor",
            SuiteKind::ActionList => "action-list",
            SuiteKind::ActionReference => "action-reference",
            SuiteKind::Handle => "handle",
            SuiteKind::Buffer => "buffer",
            SuiteKind::ColorSpace => "color-space",
        }
    }

    /// Look a suite up by registered name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A negotiated suite: kind plus one of its offered versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SuiteKey {
    pub kind: SuiteKind,
    pub version: i32,
}

impl std::fmt::Display for SuiteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.kind, self.version)
    }
}

/// Listing entry for a suite.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteInfo {
    pub kind: SuiteKind,
    pub name: &'static str,
    pub versions: &'static [i32],
}

/// Every suite and its offered versions.
pub fn offered_suites() -> Vec<SuiteInfo> {
    SuiteKind::ALL
        .into_iter()
        .map(|kind| SuiteInfo {
            kind,
            name: kind.name(),
            versions: kind.versions(),
        })
        .collect()
}

/// Why a suite could not be acquired or released.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuiteAcquireError {
    /// No suite is registered under this name.
    #[error("No suite registered under '{0}'")]
    NotFound(String),
    /// The suite exists but the requested version is not offered.
    #[error("Suite {kind} does not offer version {requested} (supported: {supported:?})")]
    UnsupportedVersion {
        kind: SuiteKind,
        requested: i32,
        supported: &'static [i32],
    },
    /// Release without a matching acquire.
    #[error("Suite {0} released more often than acquired")]
    NotAcquired(SuiteKey),
}

impl From<SuiteAcquireError> for SuiteError {
    fn from(err: SuiteAcquireError) -> Self {
        match err {
            SuiteAcquireError::NotFound(_) => SuiteError::SuiteNotFound,
            SuiteAcquireError::UnsupportedVersion { .. } => SuiteError::SuiteVersionUnsupported,
            SuiteAcquireError::NotAcquired(_) => SuiteError::BadParameter,
        }
    }
}

/// Resolve a requested name and version to an offered suite.
pub fn negotiate(name: &str, version: i32) -> Result<SuiteKey, SuiteAcquireError> {
    let kind = SuiteKind::from_name(name).ok_or_else(|| SuiteAcquireError::NotFound(name.to_string()))?;
    if !kind.versions().contains(&version) {
        return Err(SuiteAcquireError::UnsupportedVersion {
            kind,
            requested: version,
            supported: kind.versions(),
        });
    }
    Ok(SuiteKey { kind, version })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_known_versions() {
        for info in offered_suites() {
            for &version in info.versions {
                let key = negotiate(info.name, version).unwrap();
                assert_eq!(key.kind, info.kind);
                assert_eq!(key.version, version);
            }
        }
    }

    #[test]
    fn test_unknown_name_and_version_are_distinct_errors() {
        let missing = negotiate("No Such Suite", 1).unwrap_err();
        assert!(matches!(missing, SuiteAcquireError::NotFound(_)));
        assert_eq!(missing.to_string(), "No suite registered under 'No Such Suite'");
        assert_eq!(SuiteError::from(missing), SuiteError::SuiteNotFound);

        let version = negotiate(SuiteKind::ActionDescriptor.name(), 3).unwrap_err();
        assert!(matches!(
            version,
            SuiteAcquireError::UnsupportedVersion { requested: 3, .. }
        ));
        assert_eq!(SuiteError::from(version), SuiteError::SuiteVersionUnsupported);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = SuiteKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SuiteKind::ALL.len());
    }
}
