//! Serde models for the remote verification APIs
//!
//! Every field carries a default so an absent or unexpected field reads as
//! "not verified" for that entry instead of failing the whole payload.

use serde::Deserialize;

/// One page of the Flathub verified-app collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifiedAppsPage {
    #[serde(default)]
    pub hits: Vec<VerifiedAppHit>,
    #[serde(default, rename = "totalHits")]
    pub total_hits: u64,
    #[serde(default, rename = "totalPages")]
    pub total_pages: u32,
}

/// One app entry within a collection page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifiedAppHit {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub verification_verified: bool,
}

/// Snap store info payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapInfo {
    #[serde(default)]
    pub snap: SnapDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapDetails {
    #[serde(default)]
    pub publisher: SnapPublisher,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapPublisher {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "display-name")]
    pub display_name: Option<String>,
    /// `"verified"` is the sole trust signal; anything else is untrusted.
    #[serde(default)]
    pub validation: Option<String>,
}

impl SnapPublisher {
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.validation.as_deref() == Some("verified")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_tolerates_missing_fields() {
        let page: VerifiedAppsPage = serde_json::from_str(r#"{"hits":[{"app_id":"org.gimp.GIMP"}]}"#).unwrap();
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.hits.len(), 1);
        assert!(!page.hits[0].verification_verified);
    }

    #[test]
    fn snap_info_tolerates_missing_publisher() {
        let info: SnapInfo = serde_json::from_str(r#"{"snap":{}}"#).unwrap();
        assert!(!info.snap.publisher.is_verified());

        let info: SnapInfo = serde_json::from_str(
            r#"{"snap":{"publisher":{"id":"x","display-name":"X","validation":"verified"}}}"#,
        )
        .unwrap();
        assert!(info.snap.publisher.is_verified());

        let info: SnapInfo =
            serde_json::from_str(r#"{"snap":{"publisher":{"validation":"unproven"}}}"#).unwrap();
        assert!(!info.snap.publisher.is_verified());
    }
}
