//! Session orchestration controller for formassist.
//!
//! This crate owns the client-side state machine: session identity, the
//! message timeline, the form catalog, the three asynchronous operations
//! (chat, upload, fill) and the download handshake. It defines the "ports"
//! ([`backend::AssistantBackend`], [`download::ArtifactSink`]) that the
//! infrastructure layer implements, and depends only on `formassist-types`
//! -- never on `formassist-infra` or any HTTP/IO crate.

pub mod backend;
pub mod catalog;
pub mod download;
pub mod failure;
pub mod orchestrator;
pub mod session;
pub mod state;
pub mod timeline;
