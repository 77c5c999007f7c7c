//! Request and response types for the Bedrock Runtime Converse API
//!
//! Field names follow the service's camelCase JSON. Every response field is
//! optional and unknown fields are ignored, so a partial or unexpected body
//! still decodes and is classified by the caller instead of failing here.

use crate::config::InferenceSettings;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One Converse call
///
/// The model id is not part of the JSON body; it goes into the request path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverseRequest {
    #[serde(skip)]
    pub model_id: String,
    pub messages: Vec<Message>,
    pub inference_config: InferenceConfig,
}

impl ConverseRequest {
    /// Build a single-turn request carrying one user message
    ///
    /// The message holds exactly one content block: the text, marked with a
    /// cache point so the endpoint can reuse an already processed prefix.
    pub fn single_turn(settings: &InferenceSettings, text: &str) -> Self {
        Self {
            model_id: settings.model_id().to_string(),
            messages: vec![Message {
                role: Role::User,
                content: vec![ContentBlock::text(text).with_cache_point()],
            }],
            inference_config: InferenceConfig::from(settings),
        }
    }
}

/// Conversation role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message sent to the model
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Message", 2)?;
        state.serialize_field("role", &self.role)?;
        state.serialize_field("content", &WireContent(&self.content))?;
        state.end()
    }
}

/// Outbound content block: text with an optional cache hint
///
/// Bedrock expects the hint as a separate union member, so on the wire a
/// block becomes `{"text": "..."}` followed by `{"cachePoint": {...}}` when
/// the hint is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub text: String,
    pub cache_point: Option<CachePoint>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cache_point: None,
        }
    }

    pub fn with_cache_point(mut self) -> Self {
        self.cache_point = Some(CachePoint::default());
        self
    }

    fn wire_parts(&self) -> impl Iterator<Item = WirePart<'_>> {
        std::iter::once(WirePart::Text(&self.text))
            .chain(self.cache_point.as_ref().map(WirePart::CachePoint))
    }
}

struct WireContent<'a>(&'a [ContentBlock]);

impl Serialize for WireContent<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().flat_map(ContentBlock::wire_parts))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum WirePart<'a> {
    Text(&'a str),
    CachePoint(&'a CachePoint),
}

/// Prompt caching hint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachePoint {
    #[serde(rename = "type")]
    pub kind: CachePointType,
}

impl Default for CachePoint {
    fn default() -> Self {
        Self {
            kind: CachePointType::Default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePointType {
    Default,
}

/// Inference parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&InferenceSettings> for InferenceConfig {
    fn from(settings: &InferenceSettings) -> Self {
        Self {
            max_tokens: settings.max_tokens(),
            temperature: settings.temperature(),
        }
    }
}

/// Converse response body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverseResponse {
    #[serde(default)]
    pub output: Option<ConverseOutput>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl ConverseResponse {
    /// Text of the first content block, if it exists and is non-empty
    pub fn first_text(&self) -> Option<&str> {
        self.message()?
            .content
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    /// The output message, if the response carries one
    pub fn message(&self) -> Option<&OutputMessage> {
        self.output.as_ref()?.message.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConverseOutput {
    #[serde(default)]
    pub message: Option<OutputMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputMessage {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub content: Vec<OutputContentBlock>,
}

/// Inbound content block
///
/// Non-text blocks (tool use, reasoning, images) decode with `text == None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputContentBlock {
    #[serde(default)]
    pub text: Option<String>,
}

/// Token accounting for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}
