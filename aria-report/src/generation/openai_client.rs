//! OpenAI-compatible chat completion client
//!
//! Works against any service exposing `POST {base}/v1/chat/completions`
//! with bearer authentication (OpenAI, DeepSeek and self-hosted gateways).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::{Generation, GenerationError, GenerationPrompt, TextGenerator};
use aria_common::config::GeneratorSettings;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const USER_AGENT: &str = concat!("aria-report/", env!("CARGO_PKG_VERSION"));

/// Chat completion client for one configured service
pub struct OpenAiCompatibleClient {
    http_client: reqwest::Client,
    identifier: String,
    model: String,
    provider: String,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("identifier", &self.identifier)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// `{base}/v1/chat/completions` with trailing slashes on `base` removed
pub fn completions_endpoint(base_url: Option<&str>) -> String {
    let base = base_url
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);
    format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH)
}

fn build_headers(settings: &GeneratorSettings) -> Result<HeaderMap, GenerationError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &settings.extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            GenerationError::Config(format!("Invalid header name '{}': {}", name, e))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            GenerationError::Config(format!("Invalid value for header '{}': {}", name, e))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Extract `choices[0].message.content` from a completion response body
///
/// Returns the trimmed content and the parsed JSON document.
pub fn parse_completion(body: &str) -> Result<(String, Value), GenerationError> {
    let raw: Value = serde_json::from_str(body)
        .map_err(|e| GenerationError::Payload(format!("Response is not JSON: {}", e)))?;

    let content = raw
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GenerationError::Payload("Response has no choices[0].message.content".to_string())
        })?
        .trim()
        .to_string();

    Ok((content, raw))
}

impl OpenAiCompatibleClient {
    /// Validate settings, resolve the credential and build the HTTP client
    pub fn new(settings: &GeneratorSettings) -> Result<Self, GenerationError> {
        settings.validate_provider()?;
        let api_key = settings.resolve_api_key()?;
        let timeout = settings.timeout()?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .default_headers(build_headers(settings)?)
            .build()
            .map_err(|e| GenerationError::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http_client,
            identifier: settings.identifier.clone(),
            model: settings.model.clone(),
            provider: settings.provider.clone(),
            endpoint: completions_endpoint(settings.base_url.as_deref()),
            api_key,
            timeout,
        })
    }

    fn request_body(&self, prompt: &GenerationPrompt) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system_text},
                {"role": "user", "content": prompt.user_text},
            ],
            "temperature": prompt.temperature,
            "max_tokens": prompt.max_output_tokens,
            "top_p": prompt.top_p,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn generate(&self, prompt: &GenerationPrompt) -> Result<Generation, GenerationError> {
        debug!(
            client = %self.identifier,
            model = %self.model,
            endpoint = %self.endpoint,
            "Requesting chat completion"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(format!("{} after {:?}", e, self.timeout))
                } else {
                    GenerationError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout(e.to_string())
            } else {
                GenerationError::Network(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let (text, raw) = parse_completion(&body)?;
        debug!(
            client = %self.identifier,
            chars = text.chars().count(),
            "Chat completion received"
        );

        Ok(Generation {
            text,
            model: self.model.clone(),
            provider: self.provider.clone(),
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key() -> GeneratorSettings {
        GeneratorSettings {
            api_key: Some("test-key".to_string()),
            ..GeneratorSettings::new("primary", "gpt-test")
        }
    }

    #[test]
    fn test_endpoint_joining() {
        assert_eq!(
            completions_endpoint(None),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_endpoint(Some("https://api.deepseek.com/")),
            "https://api.deepseek.com/v1/chat/completions"
        );
        assert_eq!(
            completions_endpoint(Some("  ")),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_completion_trims_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Hello there \n"}}]}"#;
        let (text, raw) = parse_completion(body).unwrap();
        assert_eq!(text, "Hello there");
        assert!(raw.get("choices").is_some());
    }

    #[test]
    fn test_parse_completion_empty_content_is_ok() {
        let body = r#"{"choices":[{"message":{"content":""}}]}"#;
        let (text, _) = parse_completion(body).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_parse_completion_rejects_bad_payloads() {
        assert!(matches!(parse_completion("not json"), Err(GenerationError::Payload(_))));
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(GenerationError::Payload(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"content":42}}]}"#),
            Err(GenerationError::Payload(_))
        ));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let settings = GeneratorSettings {
            api_key_env: "ARIA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..GeneratorSettings::new("secondary", "model")
        };
        let err = OpenAiCompatibleClient::new(&settings).unwrap_err();
        assert!(matches!(err, GenerationError::Config(msg) if msg.contains("ARIA_TEST_KEY_THAT_IS_NEVER_SET")));
    }

    #[test]
    fn test_unsupported_provider_is_config_error() {
        let settings = GeneratorSettings {
            provider: "anthropic".to_string(),
            ..settings_with_key()
        };
        assert!(matches!(
            OpenAiCompatibleClient::new(&settings),
            Err(GenerationError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_extra_header_is_config_error() {
        let mut settings = settings_with_key();
        settings
            .extra_headers
            .insert("bad header".to_string(), "x".to_string());
        assert!(matches!(
            OpenAiCompatibleClient::new(&settings),
            Err(GenerationError::Config(_))
        ));
    }

    #[test]
    fn test_infinite_timeout_is_config_error() {
        let settings = GeneratorSettings {
            timeout_secs: f64::INFINITY,
            ..settings_with_key()
        };
        assert!(matches!(
            OpenAiCompatibleClient::new(&settings),
            Err(GenerationError::Config(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let client = OpenAiCompatibleClient::new(&settings_with_key()).unwrap();
        let body = client.request_body(&GenerationPrompt {
            system_text: "sys".to_string(),
            user_text: "user".to_string(),
            temperature: 0.5,
            max_output_tokens: 42,
            top_p: 1.0,
        });
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user");
        assert_eq!(body["max_tokens"], 42);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let settings = GeneratorSettings {
            base_url: Some("http://127.0.0.1:1".to_string()),
            timeout_secs: 5.0,
            ..settings_with_key()
        };
        let client = OpenAiCompatibleClient::new(&settings).unwrap();
        let prompt = GenerationPrompt {
            system_text: String::new(),
            user_text: "hi".to_string(),
            temperature: 0.0,
            max_output_tokens: 1,
            top_p: 1.0,
        };
        let err = client.generate(&prompt).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Network(_) | GenerationError::Timeout(_)
        ));
    }
}
