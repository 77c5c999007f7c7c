//! Inference adapter
//!
//! Turns one line of user text into one Converse call and renders whatever
//! comes back (a reply, a malformed reply, or a failure) as console text.
//! Nothing returned by the model endpoint escapes as an error; the only
//! errors surfaced to the caller are console write failures.

use crate::config::InferenceSettings;
use crate::converse::{ConverseRequest, ConverseResponse, ModelInvoker};
use crate::error::InvokeError;
use std::io::{self, Write};

pub const NO_TEXT_NOTICE: &str = "No text content in response";
pub const UNEXPECTED_FORMAT_NOTICE: &str = "Unexpected response format";
pub const ENDPOINT_HINT: &str = "Make sure the model ID is correct and available in your region";
pub const CREDENTIALS_HINT: &str = "Please configure your AWS credentials";

/// Sends single-turn messages to a model and prints the outcome
pub struct InferenceAdapter<I> {
    invoker: I,
    settings: InferenceSettings,
    debug: bool,
}

impl<I: ModelInvoker> InferenceAdapter<I> {
    /// Create an adapter with fixed inference settings
    pub fn new(invoker: I, settings: InferenceSettings) -> Self {
        Self {
            invoker,
            settings,
            debug: false,
        }
    }

    /// Enable or disable verbose output for unclassified failures
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Get the inference settings used for every call
    pub fn settings(&self) -> &InferenceSettings {
        &self.settings
    }

    /// Get the underlying invoker
    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Send `message` as one user turn and render the result to `out`
    ///
    /// Always ends with exactly one blank line, whatever the outcome.
    pub async fn send<W: Write>(&self, message: &str, out: &mut W) -> io::Result<()> {
        writeln!(out, "Sending message to {}...", self.settings.model_id())?;
        out.flush()?;

        let request = ConverseRequest::single_turn(&self.settings, message);
        match self.invoker.converse(&request).await {
            Ok(response) => render_response(&response, out)?,
            Err(err) => {
                tracing::debug!(kind = err.kind(), error = %err, "Converse call failed");
                render_failure(&err, self.debug, out)?;
            }
        }

        writeln!(out)?;
        out.flush()
    }
}

/// Print the reply text (or a notice) followed by token usage if present
pub fn render_response<W: Write>(response: &ConverseResponse, out: &mut W) -> io::Result<()> {
    match (response.message(), response.first_text()) {
        (_, Some(text)) => {
            writeln!(out, "\nResponse:")?;
            out.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                writeln!(out)?;
            }
        }
        (Some(_), None) => writeln!(out, "{}", NO_TEXT_NOTICE)?,
        (None, None) => writeln!(out, "{}", UNEXPECTED_FORMAT_NOTICE)?,
    }

    // Usage is independent of whether text was found
    if let Some(usage) = &response.usage {
        writeln!(out, "\nUsage:")?;
        writeln!(out, "  Input tokens: {}", usage.input_tokens)?;
        writeln!(out, "  Output tokens: {}", usage.output_tokens)?;
        writeln!(out, "  Total tokens: {}", usage.total_tokens)?;
    }
    Ok(())
}

/// Print a failure with the hint that matches its kind
pub fn render_failure<W: Write>(err: &InvokeError, debug: bool, out: &mut W) -> io::Result<()> {
    match err {
        InvokeError::Service { code, message } => {
            writeln!(out, "AWS Bedrock Error: {}", message)?;
            if let Some(code) = code {
                writeln!(out, "Error code: {}", code)?;
            }
        }
        InvokeError::EndpointResolution { message, .. } => {
            writeln!(out, "Endpoint Error: {}", message)?;
            writeln!(out, "{}", ENDPOINT_HINT)?;
        }
        InvokeError::Credentials { message } => {
            writeln!(out, "Credentials Error: {}", message)?;
            writeln!(out, "{}", CREDENTIALS_HINT)?;
        }
        InvokeError::Unclassified {
            category, message, ..
        } => {
            writeln!(out, "Error: {}", message)?;
            if debug {
                writeln!(out, "{}: {}", category, err.origin())?;
            }
        }
    }
    Ok(())
}
