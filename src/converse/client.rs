//! Bedrock Runtime client
//!
//! [`ModelInvoker`] is the only capability the inference adapter needs: send
//! one [`ConverseRequest`], get back a [`ConverseResponse`] or a classified
//! [`InvokeError`]. [`BedrockClient`] implements it over HTTPS with reqwest,
//! authenticating with a Bedrock API key as bearer token.

use super::credentials::CredentialProvider;
use super::types::{ConverseRequest, ConverseResponse};
use crate::config::EndpointConfig;
use crate::error::{AppError, AppResult, InvokeError};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Header carrying the service error code, formatted `Code:namespace-url`
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

/// Remote model endpoint capability
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Perform exactly one Converse call
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, InvokeError>;
}

/// HTTP client for the Bedrock Runtime Converse API
pub struct BedrockClient {
    http: reqwest::Client,
    region: String,
    endpoint_url: Option<String>,
    credentials: Arc<dyn CredentialProvider>,
}

impl BedrockClient {
    /// Create a client for the given endpoint configuration
    ///
    /// Neither the region nor the credentials are checked here; both are
    /// resolved on each call and reported as per-call failures.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ClientBuild`] if the underlying HTTP client cannot
    /// be constructed (e.g. TLS backend initialization failure).
    pub fn new(
        endpoint: &EndpointConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("bedrock-console/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = endpoint.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(AppError::ClientBuild)?;

        tracing::debug!(
            region = %endpoint.region(),
            endpoint_url = ?endpoint.endpoint_url(),
            credentials = %credentials.describe(),
            "Bedrock client created"
        );

        Ok(Self {
            http,
            region: endpoint.region().to_string(),
            endpoint_url: endpoint.endpoint_url().map(str::to_string),
            credentials,
        })
    }

    /// Resolve the Converse URL for a model
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::EndpointResolution`] if the region is not a
    /// syntactically valid AWS region, the model id is blank, or the endpoint
    /// override cannot be parsed as a base URL.
    pub fn converse_url(&self, model_id: &str) -> Result<Url, InvokeError> {
        if model_id.trim().is_empty() {
            return Err(InvokeError::EndpointResolution {
                message: "Cannot resolve an endpoint for an empty model id".to_string(),
                source: None,
            });
        }

        let base = match &self.endpoint_url {
            Some(url) => url.clone(),
            None => {
                if !is_valid_region(&self.region) {
                    return Err(InvokeError::EndpointResolution {
                        message: format!(
                            "Unable to resolve an endpoint for region '{}'",
                            self.region
                        ),
                        source: None,
                    });
                }
                format!("https://bedrock-runtime.{}.amazonaws.com", self.region)
            }
        };

        let mut url = Url::parse(&base).map_err(|e| InvokeError::EndpointResolution {
            message: format!("Invalid endpoint URL '{}'", base),
            source: Some(Box::new(e)),
        })?;
        url.path_segments_mut()
            .map_err(|_| InvokeError::EndpointResolution {
                message: format!("Endpoint URL '{}' cannot be used as a base", base),
                source: None,
            })?
            .pop_if_empty()
            .extend(["model", model_id, "converse"]);
        Ok(url)
    }
}

#[async_trait]
impl ModelInvoker for BedrockClient {
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, InvokeError> {
        let url = self.converse_url(&request.model_id)?;

        let token = self
            .credentials
            .bearer_token()
            .ok_or_else(|| InvokeError::Credentials {
                message: format!(
                    "Unable to locate credentials: no Bedrock API key found in {}",
                    self.credentials.describe()
                ),
            })?;

        tracing::debug!(
            url = %url,
            model_id = %request.model_id,
            region = %self.region,
            "Sending Converse request"
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_type = response
                .headers()
                .get(ERROR_TYPE_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        status = %status,
                        error = %e,
                        "Failed to read Bedrock error body"
                    );
                    String::new()
                }
            };
            let err = service_error(status, error_type.as_deref(), &body);
            tracing::warn!(
                status = %status,
                error_code = ?err.code(),
                "Bedrock rejected Converse request"
            );
            return Err(err);
        }

        let bytes = response.bytes().await.map_err(classify_transport_error)?;
        let decoded: ConverseResponse =
            serde_json::from_slice(&bytes).map_err(|e| InvokeError::Unclassified {
                category: "Decode",
                message: "Failed to decode Converse response".to_string(),
                source: Some(Box::new(e)),
            })?;

        if let Some(usage) = &decoded.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                total_tokens = usage.total_tokens,
                stop_reason = ?decoded.stop_reason,
                "Converse request completed"
            );
        }

        Ok(decoded)
    }
}

/// Whether `region` looks like an AWS region name (`us-east-1`, `eu-central-2`)
pub fn is_valid_region(region: &str) -> bool {
    !region.is_empty()
        && !region.starts_with('-')
        && !region.ends_with('-')
        && region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Map a transport-level reqwest error to a failure kind
///
/// Connection failures (DNS, refused, unreachable) mean the endpoint could
/// not be resolved; everything else is unclassified.
fn classify_transport_error(err: reqwest::Error) -> InvokeError {
    if err.is_connect() {
        let target = err
            .url()
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_else(|| "the endpoint".to_string());
        return InvokeError::EndpointResolution {
            message: format!("Could not connect to the endpoint URL: {}", target),
            source: Some(Box::new(err)),
        };
    }

    let (category, message) = if err.is_timeout() {
        ("Timeout", "Request to Bedrock timed out")
    } else if err.is_body() || err.is_decode() {
        ("Body", "Failed to read Converse response body")
    } else {
        ("Transport", "HTTP request to Bedrock failed")
    };
    InvokeError::Unclassified {
        category,
        message: message.to_string(),
        source: Some(Box::new(err)),
    }
}

/// Build a service failure from a non-success response
///
/// The code comes from the `x-amzn-ErrorType` header, falling back to the
/// body's `__type`. The message comes from the body's `message`/`Message`,
/// falling back to the raw body and finally the HTTP status.
fn service_error(status: StatusCode, error_type: Option<&str>, body: &str) -> InvokeError {
    let json: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let header_code = error_type
        .and_then(|value| value.split(':').next())
        .map(str::trim)
        .filter(|code| !code.is_empty());
    let body_code = json
        .as_ref()
        .and_then(|v| v.get("__type"))
        .and_then(|v| v.as_str())
        .and_then(|value| value.rsplit('#').next())
        .filter(|code| !code.is_empty());
    let code = header_code.or(body_code).map(str::to_string);

    let body_message = json.as_ref().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("Message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });
    let message = match body_message {
        Some(message) => message,
        None if json.is_none() && !body.trim().is_empty() => body.trim().to_string(),
        None => format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("error")
        ),
    };

    InvokeError::Service { code, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converse::credentials::StaticCredentialProvider;

    fn client(region: &str, endpoint_url: Option<&str>) -> BedrockClient {
        let endpoint = EndpointConfig::new(region, endpoint_url.map(str::to_string), None);
        BedrockClient::new(&endpoint, Arc::new(StaticCredentialProvider::new("token")))
            .expect("should build client")
    }

    #[test]
    fn test_regional_converse_url() {
        let url = client("us-east-1", None)
            .converse_url("amazon.nova-lite-v1:0")
            .expect("should resolve");
        assert_eq!(
            url.as_str(),
            "https://bedrock-runtime.us-east-1.amazonaws.com/model/amazon.nova-lite-v1:0/converse"
        );
    }

    #[test]
    fn test_override_url_with_trailing_slash() {
        let url = client("us-east-1", Some("http://localhost:8080/"))
            .converse_url("amazon.nova-micro-v1:0")
            .expect("should resolve");
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/model/amazon.nova-micro-v1:0/converse"
        );
    }

    #[test]
    fn test_model_id_with_slash_is_one_segment() {
        let arn = "arn:aws:bedrock:us-east-1:123456789012:inference-profile/us.amazon.nova-lite-v1:0";
        let url = client("us-east-1", None)
            .converse_url(arn)
            .expect("should resolve");
        assert!(url.path().contains("inference-profile%2Fus.amazon.nova-lite-v1:0"));
        assert!(url.path().ends_with("/converse"));
    }

    #[test]
    fn test_invalid_region_is_endpoint_resolution_failure() {
        let err = client("Not A Region!", None)
            .converse_url("amazon.nova-lite-v1:0")
            .expect_err("should fail");
        assert!(matches!(err, InvokeError::EndpointResolution { .. }));
        assert!(err.to_string().contains("Not A Region!"));
    }

    #[test]
    fn test_empty_model_id_is_endpoint_resolution_failure() {
        let err = client("us-east-1", None)
            .converse_url("  ")
            .expect_err("should fail");
        assert!(matches!(err, InvokeError::EndpointResolution { .. }));
    }

    #[test]
    fn test_region_syntax() {
        for region in ["us-east-1", "eu-central-2", "ap-southeast-4", "local"] {
            assert!(is_valid_region(region), "{} should be valid", region);
        }
        for region in ["", "-us", "us-", "US-EAST-1", "us east", "us.east"] {
            assert!(!is_valid_region(region), "{:?} should be invalid", region);
        }
    }

    #[test]
    fn test_service_error_code_from_header() {
        let err = service_error(
            StatusCode::BAD_REQUEST,
            Some("ValidationException:http://internal.amazon.com/coral/com.amazon.bedrock/"),
            r#"{"message":"The provided model identifier is invalid."}"#,
        );
        match err {
            InvokeError::Service { code, message } => {
                assert_eq!(code.as_deref(), Some("ValidationException"));
                assert_eq!(message, "The provided model identifier is invalid.");
            }
            other => panic!("expected Service, got {:?}", other),
        }
    }

    #[test]
    fn test_service_error_code_from_body_type() {
        let err = service_error(
            StatusCode::TOO_MANY_REQUESTS,
            None,
            r#"{"__type":"com.amazon.coral.availability#ThrottlingException","Message":"Too many requests"}"#,
        );
        assert_eq!(err.code(), Some("ThrottlingException"));
        assert_eq!(err.to_string(), "Too many requests");
    }

    #[test]
    fn test_service_error_plain_text_body() {
        let err = service_error(StatusCode::BAD_GATEWAY, None, "upstream unavailable\n");
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "upstream unavailable");
    }

    #[test]
    fn test_service_error_empty_body_uses_status() {
        let err = service_error(StatusCode::FORBIDDEN, None, "");
        assert_eq!(err.to_string(), "HTTP 403 Forbidden");
    }
}
