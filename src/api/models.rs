//! Wire types for the CAFM API.
//!
//! These mirror the JSON the server sends; client-side projections and
//! helpers live under `core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Level of a node in the location hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Campus,
    Building,
    Floor,
    Room,
}

impl LocationKind {
    pub fn label(self) -> &'static str {
        match self {
            LocationKind::Campus => "Campus",
            LocationKind::Building => "Building",
            LocationKind::Floor => "Floor",
            LocationKind::Room => "Room",
        }
    }
}

/// A node in the server's location tree. Children are ordered; depth is
/// derived by traversal, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    #[serde(default)]
    pub children: Vec<LocationNode>,
}

/// Asset row as returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
}

/// Full asset record. `location_id` is optional: an asset may genuinely
/// have no resolvable location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

/// Issue category taxonomy node. The model permits arbitrary nesting but
/// the client only presents two levels; a parent with no children is
/// itself selectable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCategory {
    pub id: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub children: Vec<IssueCategory>,
}

/// Service request record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub asset_name: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw image payload staged for a multipart submission.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Assembled submission for one service request. Built from a completed
/// wizard draft; `description` is already trimmed and is `None` when blank.
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub location_id: String,
    pub asset_id: Option<String>,
    pub category_id: String,
    pub description: Option<String>,
    pub images: Vec<ImagePayload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_node_missing_children_defaults_empty() {
        let node: LocationNode =
            serde_json::from_str(r#"{"id":"r1","name":"Room 101","type":"room"}"#).unwrap();
        assert!(node.children.is_empty());
        assert_eq!(node.kind, LocationKind::Room);
    }

    #[test]
    fn test_location_tree_nested_decode() {
        let json = r#"[
            {"id":"c1","name":"Main Campus","type":"campus","children":[
                {"id":"b1","name":"Block A","type":"building","children":[
                    {"id":"f1","name":"Level 1","type":"floor","children":[]}
                ]}
            ]}
        ]"#;
        let roots: Vec<LocationNode> = serde_json::from_str(json).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children[0].children[0].id, "f1");
    }

    #[test]
    fn test_issue_category_minimal_decode() {
        let cat: IssueCategory =
            serde_json::from_str(r#"{"id":"p1","name_en":"Electrical"}"#).unwrap();
        assert!(cat.name_ar.is_none());
        assert!(cat.icon.is_none());
        assert!(cat.children.is_empty());
    }

    #[test]
    fn test_service_request_decode_sparse() {
        let req: ServiceRequest = serde_json::from_str(r#"{"id":"sr-9"}"#).unwrap();
        assert_eq!(req.id, "sr-9");
        assert!(req.status.is_none());
        assert!(req.created_at.is_none());
    }
}
