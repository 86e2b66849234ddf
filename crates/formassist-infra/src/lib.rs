//! Infrastructure layer for formassist.
//!
//! Implements the ports defined in `formassist-core`: the HTTP assistant
//! backend (`reqwest`), the filesystem download sink (`tempfile` staging),
//! and the `config.toml` loader.

pub mod config;
pub mod http;
pub mod sink;
