//! Entity DTOs mirroring the backend's JSON payloads.
//!
//! Field names are camelCase on the wire. These are read-mostly copies of
//! server-owned records; nothing here is persisted client-side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::taxonomy::{
    deserialize_lenient_document_type, label_for_optional_document_type, DocumentType,
    PermissionLevel, PropertyType,
};
use crate::types::{EntityId, Timestamp};

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// An uploaded document attached to one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: EntityId,
    pub property_id: EntityId,
    /// `None` when the server sent a code this client does not know.
    #[serde(default, deserialize_with = "deserialize_lenient_document_type")]
    pub document_type: Option<DocumentType>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub expiration_date: Option<Timestamp>,
    #[serde(default)]
    pub ai_fields: Option<BTreeMap<String, String>>,
    /// Extraction confidence in `[0.0, 1.0]`.
    #[serde(default)]
    pub ai_confidence: Option<f64>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Document {
    pub fn type_label(&self) -> &'static str {
        label_for_optional_document_type(self.document_type)
    }
}

/// A grant of access on a property for one non-owner user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPermission {
    pub id: EntityId,
    pub property_id: EntityId,
    pub user_id: EntityId,
    pub property_level: PermissionLevel,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl PropertyPermission {
    /// A grant is active until its expiry instant; no expiry means forever.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at > now,
            None => true,
        }
    }
}

/// A server-generated notice about a property, usually document expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: EntityId,
    pub property_id: EntityId,
    #[serde(default)]
    pub document_id: Option<EntityId>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub due_date: Option<Timestamp>,
    #[serde(default)]
    pub is_read: bool,
}

/// A real-estate asset with its documents, grants, and alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: EntityId,
    pub owner_id: EntityId,
    #[serde(default)]
    pub name: String,
    pub property_type: PropertyType,
    #[serde(default)]
    pub parent_property_id: Option<EntityId>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub permissions: Vec<PropertyPermission>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl Property {
    pub fn is_owned_by(&self, user_id: EntityId) -> bool {
        self.owner_id == user_id
    }

    pub fn unread_alert_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.is_read).count()
    }
}

/// Body for creating a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyInput {
    pub name: String,
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_property_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Body for granting a user access to a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareInput {
    pub email: String,
    pub property_level: PermissionLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}
