//! Upload request and confirmation payloads.
//!
//! Uploads are two-phase: the client asks for a signed URL, sends the bytes
//! there, then confirms so the backend creates the document record.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::taxonomy::DocumentType;
use crate::types::{EntityId, Timestamp};

/// Longest file name accepted by the backend.
pub const MAX_FILE_NAME_LENGTH: usize = 255;

/// Phase one: ask for an upload URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub document_type: DocumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,
    #[serde(default)]
    pub encrypt: bool,
}

impl UploadRequest {
    /// Reject requests the backend would refuse anyway.
    pub fn validate(&self) -> Result<(), CoreError> {
        let name = self.file_name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("File name must not be empty".into()));
        }
        if name.chars().count() > MAX_FILE_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "File name must be at most {MAX_FILE_NAME_LENGTH} characters"
            )));
        }
        if name.contains(['/', '\\']) {
            return Err(CoreError::Validation(
                "File name must not contain path separators".into(),
            ));
        }
        if self.content_type.trim().is_empty() {
            return Err(CoreError::Validation("Content type must not be empty".into()));
        }
        if self.size_bytes == 0 {
            return Err(CoreError::Validation("File must not be empty".into()));
        }
        Ok(())
    }
}

/// Backend response to [`UploadRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub upload_url: String,
    pub upload_id: String,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

/// Phase three: confirm the bytes landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUpload {
    pub upload_id: String,
    pub property_id: EntityId,
    pub run_ai_extraction: bool,
}
