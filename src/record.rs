//! Image record data model
//!
//! Three shapes of the same entity: `ImageRecord` as persisted in the
//! document collection, `ImageResponse` as rendered on the wire, and
//! `ImagePatch` as accepted by the update operation. The stored document
//! uses camelCase keys (`lifeSpan`, `imagePath`, `createdAt`) with the
//! identifier under `_id`; the update body uses an all-lowercase
//! `lifespan` key, kept for compatibility with existing clients.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

/// One cataloged image as persisted in the document collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Store-generated identifier; `None` until insertion
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub description: String,

    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub life_span: String,

    /// Server-relative URL of the stored file; set once at creation and
    /// never changed by update
    pub image_path: String,

    /// Set once at creation
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Wire projection of a record: hex-encoded id, RFC 3339 timestamp
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub color: String,
    pub life_span: String,
    pub image_path: String,
    pub created_at: DateTime<Utc>,
}

impl From<ImageRecord> for ImageResponse {
    fn from(record: ImageRecord) -> Self {
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: record.name,
            kind: record.kind,
            description: record.description,
            color: record.color,
            life_span: record.life_span,
            image_path: record.image_path,
            created_at: record.created_at,
        }
    }
}

/// Partial update body: only keys present in the request are written
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagePatch {
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub description: Option<String>,

    pub color: Option<String>,

    /// Request key `lifespan`, stored field `lifeSpan`
    #[serde(rename = "lifespan")]
    pub life_span: Option<String>,
}

impl ImagePatch {
    /// True when no known field is present
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kind.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.life_span.is_none()
    }

    /// Build the `$set` payload with the stored field names
    pub fn set_document(&self) -> Document {
        let mut set = doc! {};
        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
        }
        if let Some(kind) = &self.kind {
            set.insert("type", kind.as_str());
        }
        if let Some(description) = &self.description {
            set.insert("description", description.as_str());
        }
        if let Some(color) = &self.color {
            set.insert("color", color.as_str());
        }
        if let Some(life_span) = &self.life_span {
            set.insert("lifeSpan", life_span.as_str());
        }
        set
    }

    /// Merge the present fields into a record in place
    pub fn apply(&self, record: &mut ImageRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(kind) = &self.kind {
            record.kind = kind.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(color) = &self.color {
            record.color = color.clone();
        }
        if let Some(life_span) = &self.life_span {
            record.life_span = life_span.clone();
        }
    }
}

/// Insert acknowledgment returned by the create operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Counts returned by the update operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mongodb::bson;

    fn sample_record() -> ImageRecord {
        ImageRecord {
            id: Some(ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap()),
            name: "Cat".to_string(),
            kind: "Mammal".to_string(),
            description: "A small cat".to_string(),
            color: "black".to_string(),
            life_span: "12 years".to_string(),
            image_path: "/uploads/1714564800000-cat.jpg".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn stored_document_uses_collection_field_names() {
        let doc = bson::to_document(&sample_record()).unwrap();
        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("type"));
        assert!(doc.contains_key("lifeSpan"));
        assert!(doc.contains_key("imagePath"));
        assert!(doc.get_datetime("createdAt").is_ok());
        assert!(!doc.contains_key("kind"));
        assert!(!doc.contains_key("life_span"));
    }

    #[test]
    fn unsaved_record_serializes_without_id() {
        let mut record = sample_record();
        record.id = None;
        let doc = bson::to_document(&record).unwrap();
        assert!(!doc.contains_key("_id"));
    }

    #[test]
    fn record_round_trips_through_bson() {
        let record = sample_record();
        let doc = bson::to_document(&record).unwrap();
        let back: ImageRecord = bson::from_document(doc).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn patch_takes_the_lowercase_lifespan_key() {
        let patch: ImagePatch = serde_json::from_str(r#"{"lifespan": "20 years"}"#).unwrap();
        assert_eq!(patch.life_span.as_deref(), Some("20 years"));
        let set = patch.set_document();
        assert!(set.contains_key("lifeSpan"));
        assert!(!set.contains_key("lifespan"));
    }

    #[test]
    fn patch_set_document_carries_only_present_fields() {
        let patch = ImagePatch {
            name: Some("Updated Cat".to_string()),
            ..Default::default()
        };
        let set = patch.set_document();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_str("name").unwrap(), "Updated Cat");
    }

    #[test]
    fn patch_apply_leaves_missing_fields_alone() {
        let mut record = sample_record();
        let patch = ImagePatch {
            name: Some("Updated Cat".to_string()),
            color: Some("grey".to_string()),
            ..Default::default()
        };
        patch.apply(&mut record);
        assert_eq!(record.name, "Updated Cat");
        assert_eq!(record.color, "grey");
        assert_eq!(record.kind, "Mammal");
        assert_eq!(record.description, "A small cat");
        assert_eq!(record.life_span, "12 years");
    }

    #[test]
    fn empty_patch_is_detected() {
        let patch: ImagePatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        let patch: ImagePatch = serde_json::from_str(r#"{"color": ""}"#).unwrap();
        assert!(!patch.is_empty());
    }

    #[test]
    fn response_renders_hex_id_and_wire_keys() {
        let value = serde_json::to_value(ImageResponse::from(sample_record())).unwrap();
        assert_eq!(value["id"].as_str().unwrap(), "507f1f77bcf86cd799439011");
        assert_eq!(value["type"], "Mammal");
        assert_eq!(value["lifeSpan"], "12 years");
        assert_eq!(value["imagePath"], "/uploads/1714564800000-cat.jpg");
        assert!(value["createdAt"].as_str().unwrap().contains('T'));
        assert!(value.get("_id").is_none());
    }
}
