//! Shared domain types for formassist.
//!
//! This crate contains the types that flow between the session controller,
//! its backend adapter, and the terminal front end: sessions, timeline
//! messages, form descriptors, operation state, wire payloads, client
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod backend;
pub mod config;
pub mod download;
pub mod error;
pub mod form;
pub mod message;
pub mod operation;
pub mod session;
