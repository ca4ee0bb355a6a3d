#![cfg_attr(not(test), forbid(unsafe_code))]

//! Shared building blocks for the AI Search client: wire models, streamed
//! reply assembly, local conversation history and configuration.

pub mod config;
pub mod history;
pub mod models;
pub mod streaming;

pub use config::{Config, ConfigError, LogFormat};
pub use history::{ChatHistory, HistoryError, PendingTurn};
pub use streaming::{AssembledReply, StreamError, StreamedReplyAssembler, drive_reply};
