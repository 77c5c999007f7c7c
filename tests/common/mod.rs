//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bedrock_console::adapter::InferenceAdapter;
use bedrock_console::config::InferenceSettings;
use bedrock_console::converse::types::{ConverseOutput, OutputContentBlock, OutputMessage};
use bedrock_console::converse::{ConverseRequest, ConverseResponse, ModelInvoker, Role, TokenUsage};
use bedrock_console::error::InvokeError;
use bedrock_console::session::Session;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Invoker that records every request and replays scripted outcomes
///
/// Once the script is exhausted every call answers with the text "ok".
#[derive(Default)]
pub struct ScriptedInvoker {
    calls: Mutex<Vec<ConverseRequest>>,
    script: Mutex<VecDeque<Result<ConverseResponse, InvokeError>>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, outcome: Result<ConverseResponse, InvokeError>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<ConverseRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, InvokeError> {
        self.calls.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(text_response("ok")))
    }
}

/// Well-formed reply carrying `text`
pub fn text_response(text: &str) -> ConverseResponse {
    ConverseResponse {
        output: Some(ConverseOutput {
            message: Some(OutputMessage {
                role: Some(Role::Assistant),
                content: vec![OutputContentBlock {
                    text: Some(text.to_string()),
                }],
            }),
        }),
        usage: None,
        stop_reason: Some("end_turn".to_string()),
    }
}

pub fn usage(input_tokens: u64, output_tokens: u64, total_tokens: u64) -> TokenUsage {
    TokenUsage {
        input_tokens,
        output_tokens,
        total_tokens,
    }
}

pub fn session(invoker: ScriptedInvoker) -> Session<ScriptedInvoker> {
    Session::new(InferenceAdapter::new(invoker, InferenceSettings::default()))
}

/// Run a session over `input` and return everything it printed
pub async fn run_session(session: &Session<ScriptedInvoker>, input: &str) -> String {
    let mut output = Vec::new();
    session
        .run(input.as_bytes(), &mut output)
        .await
        .expect("session should not fail on in-memory I/O");
    String::from_utf8(output).expect("output should be UTF-8")
}
