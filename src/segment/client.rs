//! Gemini-backed script segmentation
//!
//! The model is asked for a strict JSON array of `{character, text}` objects
//! via a response schema. Anything that deviates from that shape is a hard
//! segmentation failure; there is no heuristic recovery and no retry. The
//! call is not idempotent: the same script may segment differently across
//! calls.

use crate::segment::prompt::SEGMENT_PROMPT;
use crate::{CuelineError, Result};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// One spoken turn as returned by the segmentation service.
///
/// Extra fields in the response are rejected, not ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Turn {
    pub character: String,
    pub text: String,
}

/// Configuration for the segmentation client
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// API key; empty means segmentation fails per attempt with a config error
    pub api_key: String,
    /// Model id used for the generateContent call
    pub model: String,
    /// API base URL (overridable for tests)
    pub api_base: String,
    /// Overall request timeout
    pub timeout: Duration,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Strictly parse a model response into turns.
///
/// Malformed JSON, a non-array, missing fields, unknown fields, and an empty
/// array are all hard failures.
pub fn parse_turns(raw: &str) -> Result<Vec<Turn>> {
    let turns: Vec<Turn> = serde_json::from_str(raw.trim())
        .map_err(|e| CuelineError::SegmentationError(format!("Malformed response: {}", e)))?;

    if turns.is_empty() {
        return Err(CuelineError::SegmentationError(
            "No lines recognized in the script".into(),
        ));
    }

    Ok(turns)
}

// Response envelope of the generateContent call; only the text parts matter.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Result<String> {
        let candidate = self.candidates.first().ok_or_else(|| {
            CuelineError::SegmentationError("Response contained no candidates".into())
        })?;
        Ok(candidate
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect())
    }
}

/// HTTP segmentation client
pub struct GeminiSegmenter {
    config: SegmentConfig,
    client: HttpClient,
}

impl GeminiSegmenter {
    pub fn new(config: SegmentConfig) -> Self {
        let client = HttpClient::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| HttpClient::new());

        Self { config, client }
    }

    /// Segment a raw script into ordered character/text turns
    pub async fn segment(&self, script: &str) -> Result<Vec<Turn>> {
        if self.config.api_key.is_empty() {
            return Err(CuelineError::ConfigError(format!(
                "{} is not set",
                API_KEY_ENV
            )));
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": format!("{}{}", SEGMENT_PROMPT, script) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "character": { "type": "STRING" },
                            "text": { "type": "STRING" }
                        },
                        "required": ["character", "text"]
                    }
                }
            }
        });

        debug!("Sending segmentation request to {}", self.config.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CuelineError::SegmentationError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CuelineError::SegmentationError(format!(
                "Segmentation service returned {}: {}",
                status, detail
            )));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CuelineError::SegmentationError(format!("Malformed envelope: {}", e)))?;

        let turns = parse_turns(&envelope.text()?)?;
        info!("Segmented script into {} turns", turns.len());
        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_array() {
        let raw = r#"[{"character":"ANA","text":"Hello"},{"character":"BOB","text":"Hi there"}]"#;
        let turns = parse_turns(raw).unwrap();

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].character, "ANA");
        assert_eq!(turns[0].text, "Hello");
        assert_eq!(turns[1].character, "BOB");
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let raw = "  \n[{\"character\":\"ANA\",\"text\":\"Hello\"}]\n ";
        assert_eq!(parse_turns(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_turns("Sorry, I can't help with that.").is_err());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_turns(r#"{"character":"ANA","text":"Hello"}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        assert!(parse_turns(r#"[{"character":"ANA"}]"#).is_err());
    }

    #[test]
    fn test_parse_rejects_extra_field() {
        assert!(parse_turns(r#"[{"character":"ANA","text":"Hello","mood":"happy"}]"#).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_array() {
        assert!(parse_turns("[]").is_err());
    }

    #[test]
    fn test_envelope_text_extraction() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "[{\"character\":\"ANA\","},
                        {"text": "\"text\":\"Hello\"}]"}
                    ]
                }
            }]
        }"#;
        let envelope: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let turns = parse_turns(&envelope.text().unwrap()).unwrap();
        assert_eq!(turns[0].text, "Hello");
    }

    #[test]
    fn test_envelope_without_candidates_errors() {
        let envelope: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(envelope.text().is_err());
    }
}
