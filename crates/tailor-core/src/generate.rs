//! Pluggable variant generation: local placeholder substitution or a remote
//! completion call.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Marker in the template that gets replaced with the school name
pub const PLACEHOLDER: &str = "<CUSTOMIZE_TO_SCHOOL>";

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Produces a school-specific variant from a template
pub trait Generator {
    fn generate(&self, template: &str, school: &str) -> Result<String, GenerateError>;
}

/// Which generator the configuration selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    Local,
    Remote,
}

/// Deterministic substitution of the placeholder with the trimmed school name
#[derive(Debug, Clone)]
pub struct LocalGenerator {
    placeholder: String,
}

impl Default for LocalGenerator {
    fn default() -> Self {
        Self {
            placeholder: PLACEHOLDER.to_string(),
        }
    }
}

impl LocalGenerator {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }
}

impl Generator for LocalGenerator {
    fn generate(&self, template: &str, school: &str) -> Result<String, GenerateError> {
        if self.placeholder.is_empty() {
            return Err(GenerateError::Config("placeholder must not be empty".into()));
        }
        Ok(template.replace(&self.placeholder, school.trim()))
    }
}

#[derive(Serialize)]
struct CompletionRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: String,
}

/// Asks a generateContent-style endpoint to tailor the template
pub struct RemoteGenerator {
    model: String,
    api_url: String,
    api_key: String,
    placeholder: String,
    client: Client,
}

impl RemoteGenerator {
    pub fn new(
        model: impl Into<String>,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            placeholder: PLACEHOLDER.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}:generateContent?key={}",
            self.api_url, self.model, self.api_key
        )
    }

    fn prompt(&self, template: &str, school: &str) -> String {
        format!(
            "You are helping an applicant tailor a personal statement.\n\
             Rewrite the statement below for {school}. Replace every occurrence of \
             {placeholder} with content specific to {school}, keep everything else \
             as close to the original wording as possible, and return ONLY the \
             finished statement text.\n\n{template}",
            school = school.trim(),
            placeholder = self.placeholder,
            template = template,
        )
    }

    fn request_body(&self, template: &str, school: &str) -> CompletionRequest {
        CompletionRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: self.prompt(template, school),
                }],
            }],
        }
    }

    fn extract_text(response: CompletionResponse) -> Result<String, GenerateError> {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GenerateError::Api("No response content".to_string()))
    }
}

/// The request URL carries the API key, so it is stripped before formatting
fn api_error(context: &str, e: reqwest::Error) -> GenerateError {
    GenerateError::Api(format!("{}: {}", context, e.without_url()))
}

impl Generator for RemoteGenerator {
    fn generate(&self, template: &str, school: &str) -> Result<String, GenerateError> {
        if self.api_key.is_empty() {
            return Err(GenerateError::Config("API key is not set".into()));
        }
        info!("Requesting remote variant for {:?} from {}", school, self.model);

        let response = self
            .client
            .post(self.endpoint())
            .json(&self.request_body(template, school))
            .send()
            .map_err(|e| api_error("Request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GenerateError::Api(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let body: CompletionResponse = response
            .json()
            .map_err(|e| api_error("Failed to parse response", e))?;
        let text = Self::extract_text(body)?;
        debug!(len = text.len(), "Remote variant received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_replaces_every_placeholder() {
        let generator = LocalGenerator::default();
        let out = generator
            .generate(
                "Why <CUSTOMIZE_TO_SCHOOL>? Because <CUSTOMIZE_TO_SCHOOL> fits.",
                "  Rice ",
            )
            .unwrap();
        assert_eq!(out, "Why Rice? Because Rice fits.");
    }

    #[test]
    fn test_local_without_placeholder_is_identity() {
        let generator = LocalGenerator::default();
        assert_eq!(generator.generate("No marker", "Rice").unwrap(), "No marker");
    }

    #[test]
    fn test_local_custom_placeholder() {
        let generator = LocalGenerator::new("{{school}}");
        assert_eq!(
            generator.generate("Go {{school}}!", "Duke").unwrap(),
            "Go Duke!"
        );
        assert!(matches!(
            LocalGenerator::new("").generate("x", "Duke"),
            Err(GenerateError::Config(_))
        ));
    }

    #[test]
    fn test_generator_is_object_safe() {
        let generators: Vec<Box<dyn Generator>> = vec![Box::new(LocalGenerator::default())];
        assert_eq!(
            generators[0].generate(PLACEHOLDER, "UCLA").unwrap(),
            "UCLA"
        );
    }

    #[test]
    fn test_remote_requires_key() {
        let generator = RemoteGenerator::new(DEFAULT_MODEL, DEFAULT_API_URL, "");
        assert!(matches!(
            generator.generate("t", "s"),
            Err(GenerateError::Config(_))
        ));
    }

    #[test]
    fn test_remote_request_shape() {
        let generator = RemoteGenerator::new("m1", "https://example.test/models/", "k");
        assert_eq!(
            generator.endpoint(),
            "https://example.test/models/m1:generateContent?key=k"
        );

        let body = serde_json::to_value(generator.request_body("Dear <CUSTOMIZE_TO_SCHOOL>", "Penn"))
            .unwrap();
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("Penn"));
        assert!(text.ends_with("Dear <CUSTOMIZE_TO_SCHOOL>"));
    }

    #[test]
    fn test_remote_error_hides_api_key() {
        // Nothing listens on the discard port, so the send fails locally
        let generator = RemoteGenerator::new("m1", "http://127.0.0.1:9/models/", "secret-key-123");
        let err = generator.generate("t", "s").unwrap_err();
        assert!(matches!(err, GenerateError::Api(_)));
        assert!(!err.to_string().contains("secret-key-123"), "{}", err);
    }

    #[test]
    fn test_remote_response_parsing() {
        let ok: CompletionResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Dear Penn"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(RemoteGenerator::extract_text(ok).unwrap(), "Dear Penn");

        let empty: CompletionResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            RemoteGenerator::extract_text(empty),
            Err(GenerateError::Api(_))
        ));
    }

    #[test]
    fn test_generator_kind_from_str() {
        let kind: GeneratorKind = serde_json::from_str(r#""remote""#).unwrap();
        assert_eq!(kind, GeneratorKind::Remote);
        assert_eq!(GeneratorKind::default(), GeneratorKind::Local);
    }
}
