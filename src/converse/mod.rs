//! Bedrock Converse API: wire types, credentials and the HTTP client

pub mod client;
pub mod credentials;
pub mod types;

pub use client::{BedrockClient, ModelInvoker};
pub use credentials::{CredentialProvider, EnvCredentialProvider, StaticCredentialProvider};
pub use types::{ContentBlock, ConverseRequest, ConverseResponse, Role, TokenUsage};
