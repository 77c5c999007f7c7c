//! bedrock-console - Interactive console chat client for Amazon Bedrock
//!
//! Each line typed at the prompt becomes one single-turn Converse call; the
//! reply and its token usage are printed before the next prompt.

pub mod adapter;
pub mod cli;
pub mod config;
pub mod converse;
pub mod error;
pub mod session;
pub mod telemetry;
