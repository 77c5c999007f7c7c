//! Credential resolution for Bedrock calls
//!
//! Bedrock API keys are sent as a bearer token. The token is resolved on every
//! call rather than at startup, so a console started without credentials still
//! runs and reports the problem for each message instead of refusing to start.

use secrecy::SecretString;

/// Environment variable holding the Bedrock API key
pub const BEARER_TOKEN_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

/// Source of the bearer token used to authenticate calls
pub trait CredentialProvider: Send + Sync {
    /// Resolve the current token, or `None` if no credential is available
    fn bearer_token(&self) -> Option<SecretString>;

    /// Human-readable description of where the token is looked up
    fn describe(&self) -> String;
}

/// Reads the token from the process environment on every call
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    /// Provider reading [`BEARER_TOKEN_ENV`]
    pub fn new() -> Self {
        Self::from_var(BEARER_TOKEN_ENV)
    }

    /// Provider reading an arbitrary variable
    pub fn from_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn bearer_token(&self) -> Option<SecretString> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => {
                Some(SecretString::from(value.trim().to_string()))
            }
            // Blank, unset, or not unicode: unusable as a header value
            _ => None,
        }
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

/// Fixed token, mainly for embedding and tests
#[derive(Debug)]
pub struct StaticCredentialProvider {
    token: Option<SecretString>,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
        }
    }

    /// A provider that never yields a token
    pub fn none() -> Self {
        Self { token: None }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn bearer_token(&self) -> Option<SecretString> {
        self.token.clone()
    }

    fn describe(&self) -> String {
        "static credentials".to_string()
    }
}
