//! Settled visual requests.

use super::{VisualKind, VisualRequest};
use serde::{Deserialize, Serialize};

/// Designated fallback asset references.
pub mod placeholders {
    use super::VisualKind;

    /// Substituted for a floor plan whose generation failed.
    pub const PLAN_FAILED: &str =
        "https://placehold.co/1280x960/111827/f59e0b/png?text=Synthesis+AI:+Plan+Failed";
    /// Substituted for a render whose generation failed.
    pub const RENDER_FAILED: &str =
        "https://placehold.co/1280x720/111827/f59e0b/png?text=Synthesis+AI:+Render+Failed";
    /// Fills an exterior group that ended up empty.
    pub const EXTERIOR_MISSING: &str =
        "https://placehold.co/1280x720/111827/f59e0b/png?text=Image+Not+Generated";
    /// Fills a plan group that ended up empty.
    pub const PLAN_MISSING: &str =
        "https://placehold.co/1280x960/111827/f59e0b/png?text=Plan+Not+Generated";

    /// The failure placeholder for a visual kind.
    #[must_use]
    pub fn for_failed(kind: VisualKind) -> &'static str {
        if kind == VisualKind::Plan {
            PLAN_FAILED
        } else {
            RENDER_FAILED
        }
    }
}

/// Reference to a visual asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "uri", rename_all = "snake_case")]
pub enum AssetRef {
    /// A generated asset (URI or data URI).
    Resolved(String),
    /// A designated fallback, used when generation failed or nothing was generated.
    Placeholder(String),
}

impl AssetRef {
    /// The underlying URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            Self::Resolved(uri) | Self::Placeholder(uri) => uri,
        }
    }

    /// Returns true for fallback assets.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// The result of executing one [`VisualRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualArtifact {
    /// Index of the owning design.
    pub design_index: usize,
    /// Kind copied from the request.
    pub kind: VisualKind,
    /// Room tag copied from the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Level tag copied from the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// The generated or fallback asset.
    pub asset: AssetRef,
}

impl VisualArtifact {
    /// Creates a resolved artifact for a request.
    #[must_use]
    pub fn resolved(request: &VisualRequest, uri: impl Into<String>) -> Self {
        Self::with_asset(request, AssetRef::Resolved(uri.into()))
    }

    /// Creates the failure placeholder for a request.
    #[must_use]
    pub fn placeholder(request: &VisualRequest) -> Self {
        Self::with_asset(
            request,
            AssetRef::Placeholder(placeholders::for_failed(request.kind).to_string()),
        )
    }

    fn with_asset(request: &VisualRequest, asset: AssetRef) -> Self {
        Self {
            design_index: request.design_index,
            kind: request.kind,
            room: request.room.clone(),
            level: request.level.clone(),
            asset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_keeps_request_tags() {
        let request = VisualRequest::new(2, VisualKind::Interior, "sunlit kitchen").with_room("Kitchen");
        let artifact = VisualArtifact::resolved(&request, "data:image/jpeg;base64,AAAA");

        assert_eq!(artifact.design_index, 2);
        assert_eq!(artifact.kind, VisualKind::Interior);
        assert_eq!(artifact.room.as_deref(), Some("Kitchen"));
        assert!(!artifact.asset.is_placeholder());
    }

    #[test]
    fn test_placeholder_depends_on_kind() {
        let plan = VisualRequest::new(0, VisualKind::Plan, "ground floor").with_level("Ground Floor");
        let night = VisualRequest::new(0, VisualKind::Night, "lit facade");

        assert_eq!(VisualArtifact::placeholder(&plan).asset.uri(), placeholders::PLAN_FAILED);
        assert_eq!(VisualArtifact::placeholder(&night).asset.uri(), placeholders::RENDER_FAILED);
        assert!(VisualArtifact::placeholder(&night).asset.is_placeholder());
    }

    #[test]
    fn test_asset_ref_serialization() {
        let json = serde_json::to_value(AssetRef::Placeholder("x".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "placeholder", "uri": "x"}));
    }
}
