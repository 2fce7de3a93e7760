//! HTTP client for the Gemini-style generation backend, plus a
//! configurable mock for tests.
//!
//! The client only moves bytes and extracts the first candidate text;
//! interpreting that text is the parser's and sanitizer's job.

use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parser::parse_candidate_response;
use super::prompt;
use super::types::{
    EssayWriter, Identification, MediaFinder, PlantIdentifier, RecordSynthesizer,
    MAX_RECORD_IMAGES,
};
use super::GenerationError;
use crate::config::GeneratorConfig;
use crate::models::{IdentificationConfidence, Plant};

pub struct GeminiClient {
    base_url: String,
    api_key: String,
    record_model: String,
    essay_model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            record_model: config.record_model.clone(),
            essay_model: config.essay_model.clone(),
            client,
        })
    }

    async fn generate(&self, model: &str, parts: Vec<Part>) -> Result<String, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                GenerationError::Connection(self.base_url.clone())
            } else {
                GenerationError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::MalformedResponse("response carried no candidate text".into())
            })
    }

    fn identification_from_value(value: &Value) -> Option<Identification> {
        if !value.get("isPlant").and_then(Value::as_bool).unwrap_or(false) {
            return None;
        }
        let confidence = value
            .get("confidence")
            .and_then(Value::as_str)
            .and_then(|c| IdentificationConfidence::from_str(&c.to_lowercase()).ok());
        // A low-confidence identification is treated as no identification.
        if matches!(confidence, Some(IdentificationConfidence::Low)) {
            return None;
        }

        let name = value.get("name").and_then(Value::as_str)?.trim();
        if name.is_empty() {
            return None;
        }
        Some(Identification {
            display_name: name.to_string(),
            scientific_name: value
                .get("scientificName")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            english_name: value
                .get("englishName")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            confidence,
        })
    }
}

#[async_trait::async_trait]
impl PlantIdentifier for GeminiClient {
    async fn identify_from_image(
        &self,
        image: &[u8],
    ) -> Result<Option<Identification>, GenerationError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let parts = vec![
            Part::text(prompt::identify_image_prompt()),
            Part::inline_image("image/jpeg", encoded),
        ];
        let text = self.generate(&self.record_model, parts).await?;
        let value = parse_candidate_response(&text)?;
        Ok(Self::identification_from_value(&value))
    }

    async fn identify_from_text(
        &self,
        situation: &str,
    ) -> Result<Option<Identification>, GenerationError> {
        let parts = vec![Part::text(prompt::identify_text_prompt(situation))];
        let text = self.generate(&self.record_model, parts).await?;
        let value = parse_candidate_response(&text)?;
        Ok(Self::identification_from_value(&value))
    }
}

#[async_trait::async_trait]
impl RecordSynthesizer for GeminiClient {
    async fn synthesize(
        &self,
        display_name: &str,
        scientific_name: &str,
    ) -> Result<Value, GenerationError> {
        let parts = vec![Part::text(prompt::synthesis_prompt(
            display_name,
            scientific_name,
        ))];
        let text = self.generate(&self.record_model, parts).await?;
        parse_candidate_response(&text)
    }
}

#[async_trait::async_trait]
impl MediaFinder for GeminiClient {
    async fn find_images(
        &self,
        display_name: &str,
        english_name: Option<&str>,
        scientific_name: &str,
    ) -> Result<Vec<String>, GenerationError> {
        let parts = vec![Part::text(prompt::media_prompt(
            display_name,
            english_name,
            scientific_name,
            MAX_RECORD_IMAGES,
        ))];
        let text = self.generate(&self.record_model, parts).await?;
        let value = parse_candidate_response(&text)?;

        let urls = value
            .get("images")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|u| u.starts_with("http"))
                    .map(str::to_string)
                    .take(MAX_RECORD_IMAGES)
                    .collect()
            })
            .unwrap_or_default();
        Ok(urls)
    }
}

#[async_trait::async_trait]
impl EssayWriter for GeminiClient {
    async fn recommendation_essay(
        &self,
        situation: &str,
        plant: &Plant,
    ) -> Result<String, GenerationError> {
        let summary = plant.horticulture.summary.as_deref().unwrap_or("");
        let parts = vec![Part::text(prompt::essay_prompt(
            situation,
            &plant.display_name,
            &plant.flower_info.language,
            summary,
        ))];
        let text = self.generate(&self.essay_model, parts).await?;
        Ok(text.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn inline_image(mime_type: &str, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

// ---------------------------------------------------------------------------
// Mock backend for tests
// ---------------------------------------------------------------------------

/// Configurable in-process generation backend. Counts calls so tests can
/// assert which pipeline stages actually ran.
#[cfg(test)]
pub struct MockGenerator {
    pub identification: Option<Identification>,
    pub candidate: Value,
    pub images: Vec<String>,
    pub essay: String,
    pub fail_synthesis: bool,
    pub fail_media: bool,
    pub fail_essay: bool,
    pub synthesize_calls: std::sync::atomic::AtomicUsize,
    pub media_calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockGenerator {
    pub fn new(candidate: Value) -> Self {
        Self {
            identification: None,
            candidate,
            images: Vec::new(),
            essay: "a comforting essay".into(),
            fail_synthesis: false,
            fail_media: false,
            fail_essay: false,
            synthesize_calls: std::sync::atomic::AtomicUsize::new(0),
            media_calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_identification(mut self, identification: Identification) -> Self {
        self.identification = Some(identification);
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn failing_synthesis(mut self) -> Self {
        self.fail_synthesis = true;
        self
    }

    pub fn failing_media(mut self) -> Self {
        self.fail_media = true;
        self
    }

    pub fn failing_essay(mut self) -> Self {
        self.fail_essay = true;
        self
    }

    pub fn synthesize_count(&self) -> usize {
        self.synthesize_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn media_count(&self) -> usize {
        self.media_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl PlantIdentifier for MockGenerator {
    async fn identify_from_image(
        &self,
        _image: &[u8],
    ) -> Result<Option<Identification>, GenerationError> {
        Ok(self.identification.clone())
    }

    async fn identify_from_text(
        &self,
        _situation: &str,
    ) -> Result<Option<Identification>, GenerationError> {
        Ok(self.identification.clone())
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl RecordSynthesizer for MockGenerator {
    async fn synthesize(
        &self,
        _display_name: &str,
        _scientific_name: &str,
    ) -> Result<Value, GenerationError> {
        self.synthesize_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_synthesis {
            return Err(GenerationError::ApiError {
                status: 503,
                body: "overloaded".into(),
            });
        }
        Ok(self.candidate.clone())
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl MediaFinder for MockGenerator {
    async fn find_images(
        &self,
        _display_name: &str,
        _english_name: Option<&str>,
        _scientific_name: &str,
    ) -> Result<Vec<String>, GenerationError> {
        self.media_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_media {
            return Err(GenerationError::Connection("image search down".into()));
        }
        Ok(self.images.clone())
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl EssayWriter for MockGenerator {
    async fn recommendation_essay(
        &self,
        _situation: &str,
        _plant: &Plant,
    ) -> Result<String, GenerationError> {
        if self.fail_essay {
            return Err(GenerationError::Connection("essay backend down".into()));
        }
        Ok(self.essay.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identification_requires_is_plant() {
        let value = json!({"isPlant": false, "name": "장미"});
        assert!(GeminiClient::identification_from_value(&value).is_none());
    }

    #[test]
    fn identification_rejects_low_confidence() {
        let value = json!({"isPlant": true, "confidence": "low", "name": "장미"});
        assert!(GeminiClient::identification_from_value(&value).is_none());
    }

    #[test]
    fn identification_extracts_names() {
        let value = json!({
            "isPlant": true,
            "confidence": "high",
            "name": "장미",
            "englishName": "Rose",
            "scientificName": "Rosa canina"
        });
        let ident = GeminiClient::identification_from_value(&value).unwrap();
        assert_eq!(ident.display_name, "장미");
        assert_eq!(ident.scientific_name.as_deref(), Some("Rosa canina"));
        assert_eq!(ident.english_name.as_deref(), Some("Rose"));
        assert_eq!(ident.confidence, Some(IdentificationConfidence::High));
    }

    #[test]
    fn identification_requires_nonempty_name() {
        let value = json!({"isPlant": true, "confidence": "high", "name": "  "});
        assert!(GeminiClient::identification_from_value(&value).is_none());
    }

    #[test]
    fn missing_confidence_is_accepted() {
        let value = json!({"isPlant": true, "name": "장미"});
        let ident = GeminiClient::identification_from_value(&value).unwrap();
        assert_eq!(ident.confidence, None);
    }

    #[test]
    fn client_constructor_trims_trailing_slash() {
        let config = GeneratorConfig {
            base_url: "https://example.test/v1beta/".into(),
            api_key: "k".into(),
            record_model: "record".into(),
            essay_model: "essay".into(),
            timeout_secs: 5,
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://example.test/v1beta");
    }
}
