//! AssistantBackend trait definition.
//!
//! The remote collaborator that answers chat turns, stores uploaded
//! documents, and renders filled forms. Uses native async fn in traits
//! (RPITIT); implementations live in formassist-infra (e.g. `HttpBackend`)
//! and in test modules.

use std::future::Future;

use formassist_types::backend::{ChatReply, ChatRequest, FillFormRequest, UploadFile, UploadReceipt};
use formassist_types::download::BinaryPayload;
use formassist_types::error::BackendError;
use formassist_types::form::FormDescriptor;
use formassist_types::session::SessionId;

/// Port for the assistant backend.
pub trait AssistantBackend: Send + Sync {
    /// Fetch the available form definitions.
    fn list_forms(&self) -> impl Future<Output = Result<Vec<FormDescriptor>, BackendError>> + Send;

    /// Run one chat turn.
    fn chat(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, BackendError>> + Send;

    /// Store a document against the session.
    fn upload(
        &self,
        session_id: &SessionId,
        file: &UploadFile,
    ) -> impl Future<Output = Result<UploadReceipt, BackendError>> + Send;

    /// Generate a filled form. Success is a binary body, not JSON.
    fn fill_form(
        &self,
        request: &FillFormRequest,
    ) -> impl Future<Output = Result<BinaryPayload, BackendError>> + Send;
}
