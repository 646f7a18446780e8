//! Minimal blocking client for the hosted model's `generateContent` endpoint.
//!
//! The pipeline treats the model as an opaque service: one request, one
//! response, no retries. The base URL is configurable so tests can point the
//! client at a local server.

use std::path::Path;
use std::time::Duration;

use base64::Engine as Base64Engine;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default public endpoint for the Gemini REST API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for both detection and generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// One part of a request or response content block.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64-encoded binary payload (the wireframe image).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct ContentBlock {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: ContentBlock,
}

/// Blocking client bound to one model and one API key.
pub struct GeminiClient {
    http: Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_base: &str, model: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            Error::ExternalService(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    /// Send one content block and return the concatenated text of the first
    /// candidate. An empty reply is an error; the caller has nothing useful
    /// to do with it.
    pub fn generate(&self, parts: Vec<Part>) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let request = GenerateRequest {
            contents: vec![ContentBlock { parts }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| Error::ExternalService(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "Model endpoint returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| Error::ExternalService(format!("Unparseable response: {}", e)))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::ExternalService("Model returned no text".to_string()));
        }
        Ok(text)
    }

    /// Text-only convenience wrapper.
    pub fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate(vec![Part::text(prompt)])
    }

    /// Send a prompt together with an image file attached inline.
    pub fn generate_with_image(&self, prompt: &str, image_path: &Path) -> Result<String> {
        let bytes = std::fs::read(image_path)
            .map_err(|_| Error::FileNotFound(image_path.display().to_string()))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let mime = mime_for_image(image_path);
        self.generate(vec![Part::text(prompt), Part::inline_data(mime, encoded)])
    }
}

/// Read the API key from a plain-text file: first line, trimmed.
pub fn load_api_key(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_| Error::FileNotFound(path.display().to_string()))?;
    let key = contents.lines().next().unwrap_or("").trim().to_string();
    if key.is_empty() {
        return Err(Error::ExternalService(format!(
            "API key file {} is empty",
            path.display()
        )));
    }
    Ok(key)
}

fn mime_for_image(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "image/png",
    }
}

/// Strip a single surrounding markdown code fence, if present. Models often
/// wrap JSON or HTML replies in ```json / ```html fences.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().collect();
    lines.remove(0);
    if lines.last().map(|l| l.trim() == "```").unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_code_fence_handles_tagged_fences() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"a\": 1}");
        let html = "```html\n<html></html>\n```";
        assert_eq!(strip_code_fence(html), "<html></html>");
    }

    #[test]
    fn strip_code_fence_leaves_plain_text_alone() {
        assert_eq!(strip_code_fence("  hello\nworld  "), "hello\nworld");
    }

    #[test]
    fn strip_code_fence_tolerates_missing_closer() {
        assert_eq!(strip_code_fence("```\npartial"), "partial");
    }

    #[test]
    fn api_key_is_first_line_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        std::fs::write(&path, "  secret-key  \nsecond line ignored\n").unwrap();
        assert_eq!(load_api_key(&path).unwrap(), "secret-key");
    }

    #[test]
    fn missing_key_file_is_file_not_found() {
        let err = load_api_key(Path::new("/nonexistent/key.txt")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn empty_key_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        std::fs::write(&path, "\n").unwrap();
        assert!(load_api_key(&path).is_err());
    }

    #[test]
    fn mime_guess_follows_extension() {
        assert_eq!(mime_for_image(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_image(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_image(Path::new("a")), "image/png");
    }

    #[test]
    fn request_serializes_inline_data() {
        let req = GenerateRequest {
            contents: vec![ContentBlock {
                parts: vec![Part::text("hi"), Part::inline_data("image/png", "QUJD")],
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
    }

    #[test]
    fn response_text_is_concatenated() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        assert_eq!(text, "ab");
    }
}
