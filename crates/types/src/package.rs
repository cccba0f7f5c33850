//! Package source tags and identifier handling

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vouch_errors::{Error, VerifyError};

/// Distribution source a package is offered through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageSource {
    Flatpak,
    Snap,
}

impl fmt::Display for PackageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flatpak => write!(f, "flatpak"),
            Self::Snap => write!(f, "snap"),
        }
    }
}

impl FromStr for PackageSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flatpak" => Ok(Self::Flatpak),
            "snap" => Ok(Self::Snap),
            other => Err(VerifyError::UnknownSource(other.to_string()).into()),
        }
    }
}

/// Which trust source attested a package, for badge attribution only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationSource {
    /// Flathub's verified-app collection
    Flathub,
    /// Curated snap publisher list, optionally enriched from the store API
    Snapcraft,
}

impl fmt::Display for VerificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flathub => write!(f, "flathub"),
            Self::Snapcraft => write!(f, "snapcraft"),
        }
    }
}

/// Strip an install-mode qualifier from a package identifier.
///
/// Snap listings carry qualifiers after the name (`"code --classic"`);
/// the canonical identifier is everything before the first whitespace.
#[must_use]
pub fn canonical_name(id: &str) -> &str {
    id.split_whitespace().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_strips_qualifier() {
        assert_eq!(canonical_name("code --classic"), "code");
        assert_eq!(canonical_name("code"), "code");
        assert_eq!(canonical_name("intellij-idea-ultimate --classic --edge"), "intellij-idea-ultimate");
    }

    #[test]
    fn canonical_name_handles_degenerate_input() {
        assert_eq!(canonical_name(""), "");
        assert_eq!(canonical_name("   "), "");
        assert_eq!(canonical_name("  code"), "code");
    }

    #[test]
    fn package_source_round_trips() {
        assert_eq!("flatpak".parse::<PackageSource>().unwrap(), PackageSource::Flatpak);
        assert_eq!("Snap".parse::<PackageSource>().unwrap(), PackageSource::Snap);
        assert!("apt".parse::<PackageSource>().is_err());
        assert_eq!(PackageSource::Flatpak.to_string(), "flatpak");
    }
}
