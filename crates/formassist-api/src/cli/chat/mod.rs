//! Interactive chat session for formassist.
//!
//! Free text goes to the backend as a chat turn; slash commands upload
//! documents, pick and fill forms, and manage the banner. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod render;
