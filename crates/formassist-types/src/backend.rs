//! Request and response bodies exchanged with the assistant backend.
//!
//! JSON field names follow the backend's camelCase contract (`sessionId`,
//! `formTypeId`). Optional response fields default so older backends that
//! omit them still decode.

use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// Value of `action_needed` telling the client to offer a form fill.
pub const ACTION_TRIGGER_FILL_FORM: &str = "trigger_fill_form";

/// File extensions the document picker offers for upload.
pub const ACCEPTED_UPLOAD_EXTENSIONS: &[&str] = &[
    "pdf", "txt", "jpg", "jpeg", "png", "tiff", "bmp", "gif", "webp",
];

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub session_id: SessionId,
}

/// Successful `POST /chat` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_needed: Option<String>,
}

impl ChatReply {
    /// Whether the backend is pointing the user at the fill action.
    pub fn suggests_fill(&self) -> bool {
        self.action_needed.as_deref() == Some(ACTION_TRIGGER_FILL_FORM)
    }
}

/// A document handed to the upload operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Whether the extension is one the picker accepts.
    pub fn is_accepted_type(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ACCEPTED_UPLOAD_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Server descriptor returned by `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Name the backend stored the document under (may be sanitized).
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /fill-form`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillFormRequest {
    pub form_type_id: String,
    pub session_id: SessionId,
}

/// Structured failure body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
