//! Session orchestration state machine.
//!
//! `Orchestrator` coordinates the three asynchronous operations (chat turn,
//! document upload, form fill) against one session. Each kind moves
//! `Idle -> InFlight -> Idle` independently; a call while its own kind is in
//! flight is swallowed. Outcomes are translated into timeline entries and,
//! for remote failures, the error banner.
//!
//! State lives in a `watch` channel. Every transition is a single
//! `send_if_modified` closure, so a guard check and the flag flip it
//! protects can never be split by an await. Timeline entries therefore land
//! in completion order, not issue order.

use tokio::sync::watch;
use tracing::{Instrument, debug, info, info_span, warn};

use formassist_types::backend::{ChatReply, ChatRequest, FillFormRequest, UploadFile, UploadReceipt};
use formassist_types::download::SavedDownload;
use formassist_types::error::{CatalogError, OperationError};
use formassist_types::form::{CatalogStatus, FormDescriptor};
use formassist_types::message::{MessageKind, Sender};
use formassist_types::operation::{OperationKind, SkipReason, Transition};
use formassist_types::session::Session;

use crate::backend::AssistantBackend;
use crate::download::{ArtifactSink, DownloadHandler, default_filename};
use crate::failure::failure_reason;
use crate::session::SessionIdentity;
use crate::state::ControllerState;

/// Banner shown when the catalog fetch fails.
pub const FORMS_LOAD_FAILED: &str = "Failed to load available forms. Please try refreshing.";

const CHAT_FALLBACK: &str = "Failed to get response from server.";
const UPLOAD_FALLBACK: &str = "Failed to upload file.";
const NO_FORM_SELECTED: &str = "Please select a form type first.";

/// The session orchestration controller.
///
/// Generic over the backend and artifact sink so the same state machine
/// runs against the HTTP adapter in production and mocks in tests.
pub struct Orchestrator<B, S> {
    session: Session,
    backend: B,
    downloads: DownloadHandler<S>,
    state: watch::Sender<ControllerState>,
}

impl<B: AssistantBackend, S: ArtifactSink> Orchestrator<B, S> {
    /// Create a controller with a fresh session and an empty timeline.
    pub fn new(backend: B, sink: S) -> Self {
        let session = SessionIdentity::create();
        let (state, _) = watch::channel(ControllerState::new(session.id.clone()));
        info!(session_id = %session.id, "session started");

        Self {
            session,
            backend,
            downloads: DownloadHandler::new(sink),
            state,
        }
    }

    /// Create a controller whose timeline opens with a bot greeting.
    pub fn with_greeting(backend: B, sink: S, greeting: Option<&str>) -> Self {
        let orchestrator = Self::new(backend, sink);
        if let Some(text) = greeting {
            orchestrator.state.send_modify(|state| {
                state.timeline.append(Sender::Bot, text, MessageKind::Text);
            });
        }
        orchestrator
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ControllerState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    /// Clear the banner without touching the timeline.
    pub fn dismiss_banner(&self) {
        self.state
            .send_if_modified(|state| state.timeline.dismiss_banner());
    }

    /// Fetch the form catalog.
    ///
    /// Runs once: a call after a successful load, or while one is running,
    /// is skipped. A failure leaves the catalog empty, raises the banner,
    /// and allows a later retry. Chat and upload are unaffected.
    pub async fn load_forms(&self) -> Transition<usize> {
        let mut skipped = None;
        self.state.send_if_modified(|state| match state.catalog.status() {
            CatalogStatus::Loaded => {
                skipped = Some(SkipReason::AlreadyLoaded);
                false
            }
            CatalogStatus::Loading => {
                skipped = Some(SkipReason::InFlight);
                false
            }
            CatalogStatus::Pending | CatalogStatus::Failed => {
                state.catalog.mark_loading();
                true
            }
        });
        if let Some(reason) = skipped {
            debug!(%reason, "catalog load skipped");
            return Transition::Skipped(reason);
        }

        let span = info_span!("formassist.load_forms", session.id = %self.session.id);
        match self.backend.list_forms().instrument(span).await {
            Ok(forms) => {
                let mut kept = 0;
                self.state.send_modify(|state| {
                    kept = state.catalog.populate(forms);
                });
                info!(forms = kept, "form catalog loaded");
                Transition::Completed(kept)
            }
            Err(err) => {
                warn!(error = %err, "failed to load form catalog");
                self.state.send_modify(|state| {
                    state.catalog.mark_failed();
                    state.timeline.raise(FORMS_LOAD_FAILED);
                });
                Transition::Failed(failure_reason(&err).unwrap_or_else(|| err.to_string()))
            }
        }
    }

    /// Change the selected form. Unknown ids are rejected and ignored.
    pub fn select_form(&self, id: &str) -> Result<(), CatalogError> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| match state.catalog.select(id) {
            Ok(changed) => changed,
            Err(err) => {
                result = Err(err);
                false
            }
        });
        if let Err(err) = &result {
            warn!(error = %err, "ignoring form selection");
        }
        result
    }

    /// Send one chat turn.
    ///
    /// The user message is appended before the call goes out. Empty or
    /// whitespace-only text is a no-op, as is a call while a chat turn is
    /// already in flight.
    pub async fn send_message(&self, text: &str) -> Transition<ChatReply> {
        if text.trim().is_empty() {
            debug!("ignoring empty chat message");
            return Transition::Skipped(SkipReason::EmptyMessage);
        }

        let entered = self.state.send_if_modified(|state| {
            if state.chat.in_flight {
                return false;
            }
            state.timeline.append(Sender::User, text, MessageKind::Text);
            state.chat.begin();
            true
        });
        if !entered {
            debug!("chat turn already in flight; dropping duplicate");
            return Transition::Skipped(SkipReason::InFlight);
        }

        let request = ChatRequest {
            message: text.to_string(),
            session_id: self.session.id.clone(),
        };
        let span = info_span!(
            "formassist.chat",
            session.id = %self.session.id,
            message.len = text.len()
        );

        match self.backend.chat(&request).instrument(span).await {
            Ok(reply) => {
                self.state.send_modify(|state| {
                    state.timeline.append(Sender::Bot, reply.reply.as_str(), MessageKind::Text);
                    state.chat.succeed();
                });
                if reply.suggests_fill() {
                    debug!("backend suggested a form fill");
                }
                Transition::Completed(reply)
            }
            Err(err) => {
                warn!(error = %err, "chat turn failed");
                let reason = failure_reason(&err).unwrap_or_else(|| CHAT_FALLBACK.to_string());
                self.record_failure(OperationKind::Chat, format!("Chat Error: {reason}"));
                Transition::Failed(reason)
            }
        }
    }

    /// Upload a document to the session.
    ///
    /// Returns `Ok(None)` when an upload is already in flight. A failure is
    /// recorded on the timeline and banner and also returned, so the caller
    /// can update its own status display.
    pub async fn upload_file(
        &self,
        file: UploadFile,
    ) -> Result<Option<UploadReceipt>, OperationError> {
        let entered = self.state.send_if_modified(|state| {
            if state.upload.in_flight {
                return false;
            }
            state.upload.begin();
            true
        });
        if !entered {
            debug!(filename = %file.filename, "upload already in flight; dropping duplicate");
            return Ok(None);
        }

        let span = info_span!(
            "formassist.upload",
            session.id = %self.session.id,
            file.name = %file.filename,
            file.bytes = file.bytes.len()
        );

        match self.backend.upload(&self.session.id, &file).instrument(span).await {
            Ok(receipt) => {
                self.state.send_modify(|state| {
                    state.timeline.append(
                        Sender::System,
                        format!("File uploaded: {}", receipt.filename),
                        MessageKind::Info,
                    );
                    state.upload.succeed();
                });
                info!(filename = %receipt.filename, "document uploaded");
                Ok(Some(receipt))
            }
            Err(err) => {
                warn!(error = %err, filename = %file.filename, "upload failed");
                let reason = failure_reason(&err).unwrap_or_else(|| UPLOAD_FALLBACK.to_string());
                self.record_failure(OperationKind::Upload, format!("Upload Error: {reason}"));
                Err(OperationError {
                    kind: OperationKind::Upload,
                    reason,
                })
            }
        }
    }

    /// Generate the selected form and save the returned file.
    ///
    /// With nothing selected, a system error is appended and the backend is
    /// not contacted. A call while a fill is in flight is a no-op.
    pub async fn fill_form(&self) -> Transition<SavedDownload> {
        let mut outcome: Result<FormDescriptor, SkipReason> = Err(SkipReason::InFlight);
        self.state.send_if_modified(|state| {
            let Some(form) = state.catalog.selected().cloned() else {
                state
                    .timeline
                    .append(Sender::System, NO_FORM_SELECTED, MessageKind::Error);
                outcome = Err(SkipReason::NoFormSelected);
                return true;
            };
            if state.fill.in_flight {
                return false;
            }
            state.timeline.append(
                Sender::System,
                format!("Attempting to fill Form {}...", form.display_name()),
                MessageKind::Info,
            );
            state.fill.begin();
            outcome = Ok(form);
            true
        });

        let form = match outcome {
            Ok(form) => form,
            Err(reason) => {
                debug!(%reason, "form fill skipped");
                return Transition::Skipped(reason);
            }
        };
        let name = form.display_name().to_string();

        let request = FillFormRequest {
            form_type_id: form.id.clone(),
            session_id: self.session.id.clone(),
        };
        let span = info_span!(
            "formassist.fill_form",
            session.id = %self.session.id,
            form.id = %form.id
        );

        let result: Result<SavedDownload, String> = async {
            let payload = match self.backend.fill_form(&request).await {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(error = %err, "form fill request failed");
                    return Err(failure_reason(&err).unwrap_or_else(|| {
                        format!("Failed to fill form {name}. Check backend logs.")
                    }));
                }
            };
            self.downloads
                .save(payload, || default_filename(&form.id))
                .await
                .map_err(|err| {
                    warn!(error = %err, "saving filled form failed");
                    err.to_string()
                })
        }
        .instrument(span)
        .await;

        match result {
            Ok(saved) => {
                self.state.send_modify(|state| {
                    state.timeline.append(
                        Sender::System,
                        format!(
                            "Form {name} generated. Download started as {}.",
                            saved.filename
                        ),
                        MessageKind::Info,
                    );
                    state.fill.succeed();
                });
                info!(filename = %saved.filename, path = %saved.path.display(), "form generated");
                Transition::Completed(saved)
            }
            Err(reason) => {
                self.record_failure(OperationKind::Fill, format!("Form Fill Error: {reason}"));
                Transition::Failed(reason)
            }
        }
    }

    /// Record a remote failure: bot error entry, then banner, then Idle.
    fn record_failure(&self, kind: OperationKind, surfaced: String) {
        self.state.send_modify(|state| {
            state
                .timeline
                .append(Sender::Bot, surfaced.as_str(), MessageKind::Error);
            state.timeline.raise(surfaced.as_str());
            state.operation_mut(kind).fail(surfaced);
        });
    }
}
