//! Language model helpers
//!
//! Two narrow uses of a hosted model:
//! - free-text analysis of an assignment's results
//! - structured grade extraction from a photographed mark sheet
//!
//! Both go through [`LanguageModel`], so handlers can be driven by
//! [`MockLanguageModel`] in tests.

use crate::config::AiConfig;
use crate::errors::{AppError, Result};
use crate::metrics::record_ai_call;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Decoded mark sheet images above this size are rejected
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const EXTRACT_INSTRUCTION: &str = "Extract all student grades from this mark sheet image. \
Include student names, marks obtained, and any other visible information like roll numbers or subject details.";

const EXTRACT_SCHEMA_HINT: &str = r#"Respond with JSON only, shaped as {"grades": [{"studentName": string, "marks": number, "rollNumber": string (optional)}], "subject": string (optional), "totalMarks": number (optional)}."#;

// ============================================================================
// Request / response types
// ============================================================================

/// One line of an analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeLine {
    pub student_name: String,
    pub marks_obtained: f64,
}

/// Body of `POST /api/ai/analyze-results`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub grades: Vec<GradeLine>,
    #[serde(default)]
    pub assignment_title: String,
    #[serde(default)]
    pub total_marks: f64,
}

impl AnalysisRequest {
    pub fn check(&self) -> Result<()> {
        if self.grades.is_empty() {
            return Err(AppError::invalid("grades", "At least one grade is required"));
        }
        if !self.total_marks.is_finite() || self.total_marks <= 0.0 {
            return Err(AppError::invalid("totalMarks", "Total marks must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedGrade {
    pub student_name: String,
    pub marks: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
}

/// What the vision model read off a mark sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedGrades {
    pub grades: Vec<ExtractedGrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_marks: Option<f64>,
}

impl ExtractedGrades {
    /// Reject model output that could not have come from a real mark sheet
    fn check(&self) -> Result<()> {
        for grade in &self.grades {
            if grade.student_name.trim().is_empty() {
                return Err(AppError::AiError {
                    message: "Extracted grade without a student name".to_string(),
                });
            }
            if !grade.marks.is_finite() || grade.marks < 0.0 {
                return Err(AppError::AiError {
                    message: format!("Extracted marks for {} are not valid", grade.student_name),
                });
            }
        }
        if let Some(total) = self.total_marks {
            if !total.is_finite() || total <= 0.0 {
                return Err(AppError::AiError {
                    message: "Extracted total marks are not valid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A mark sheet image ready to be sent as a data URL
#[derive(Debug, Clone, PartialEq)]
pub struct MarkSheetImage {
    mime: String,
    data: String,
    size: usize,
}

impl MarkSheetImage {
    /// Accepts either raw base64 or a `data:<mime>;base64,` URL
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::MissingField {
                field: "image".to_string(),
            });
        }

        let (declared_mime, data) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest.split_once(',').ok_or_else(|| AppError::InvalidFormat {
                    message: "Malformed data URL".to_string(),
                })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| AppError::InvalidFormat {
                    message: "Data URL must be base64 encoded".to_string(),
                })?;
                (Some(mime.to_string()), data)
            }
            None => (None, input),
        };

        let bytes = STANDARD.decode(data).map_err(|e| AppError::InvalidFormat {
            message: format!("Image is not valid base64: {}", e),
        })?;

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::PayloadTooLarge {
                size: bytes.len(),
                limit: MAX_IMAGE_BYTES,
            });
        }

        let mime = declared_mime
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| sniff_mime(&bytes).to_string());

        Ok(Self {
            mime,
            data: data.to_string(),
            size: bytes.len(),
        })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Decoded size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}

/// Prompt for the results analysis
pub fn analysis_prompt(request: &AnalysisRequest) -> String {
    let lines = request
        .grades
        .iter()
        .map(|g| format!("{}: {}/{}", g.student_name, g.marks_obtained, request.total_marks))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze these student grades and provide insights:\n\n\
         Assignment: {}\n\
         Total Marks: {}\n\n\
         Grades:\n{}\n\n\
         Provide:\n\
         1. Class average and median\n\
         2. Top 3 performers\n\
         3. Students who need attention (below 50%)\n\
         4. Difficulty analysis (was the exam too easy/hard?)\n\
         5. Specific recommendations for improvement\n\n\
         Format the response in a clear, structured way.",
        request.assignment_title, request.total_marks, lines
    )
}

/// Models wrap JSON in markdown fences often enough to strip them
fn strip_code_fence(text: &str) -> &str {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("fence pattern is valid")
    });

    match fence.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => text.trim(),
    }
}

/// Parse and sanity-check the extraction payload
pub fn parse_extraction(text: &str) -> Result<ExtractedGrades> {
    let extracted: ExtractedGrades =
        serde_json::from_str(strip_code_fence(text)).map_err(|e| AppError::AiError {
            message: format!("Model returned an unreadable grade sheet: {}", e),
        })?;
    extracted.check()?;
    Ok(extracted)
}

// ============================================================================
// Model abstraction
// ============================================================================

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Free-text analysis, returned verbatim
    async fn analyze_results(&self, request: &AnalysisRequest) -> Result<String>;

    /// Structured grades read from a mark sheet image
    async fn extract_grades(&self, image: &MarkSheetImage) -> Result<ExtractedGrades>;

    fn model_name(&self) -> &str;
}

/// Client for any OpenAI-compatible chat completions endpoint
pub struct OpenAiCompatibleModel {
    config: AiConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<serde_json::Value>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiCompatibleModel {
    pub fn new(config: AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { config, client })
    }

    async fn chat(&self, request: ChatRequest) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| AppError::AiError {
            message: "AI provider is not configured".to_string(),
        })?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiError {
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AiError {
                message: format!("API error {}: {}", status, body),
            });
        }

        let result: ChatResponse = response.json().await.map_err(|e| AppError::AiError {
            message: format!("Failed to parse response: {}", e),
        })?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::AiError {
                message: "Model returned no content".to_string(),
            })
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleModel {
    async fn analyze_results(&self, request: &AnalysisRequest) -> Result<String> {
        let started = Instant::now();
        let result = self
            .chat(ChatRequest {
                model: self.config.text_model.clone(),
                messages: vec![json!({ "role": "user", "content": analysis_prompt(request) })],
                max_tokens: self.config.max_tokens,
                response_format: None,
            })
            .await;

        record_ai_call("analyze", started.elapsed().as_secs_f64(), result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(error = %e, model = %self.config.text_model, "Result analysis failed");
        }
        result
    }

    async fn extract_grades(&self, image: &MarkSheetImage) -> Result<ExtractedGrades> {
        let started = Instant::now();
        let message = json!({
            "role": "user",
            "content": [
                { "type": "text", "text": format!("{} {}", EXTRACT_INSTRUCTION, EXTRACT_SCHEMA_HINT) },
                { "type": "image_url", "image_url": { "url": image.data_url() } },
            ],
        });

        let result = self
            .chat(ChatRequest {
                model: self.config.vision_model.clone(),
                messages: vec![message],
                max_tokens: self.config.max_tokens,
                response_format: Some(json!({ "type": "json_object" })),
            })
            .await
            .and_then(|text| parse_extraction(&text));

        record_ai_call("extract", started.elapsed().as_secs_f64(), result.is_ok());
        match &result {
            Ok(extracted) => tracing::info!(
                grades = extracted.grades.len(),
                image_bytes = image.size(),
                "Grades extracted from mark sheet"
            ),
            Err(e) => tracing::warn!(error = %e, model = %self.config.vision_model, "Grade extraction failed"),
        }
        result
    }

    fn model_name(&self) -> &str {
        &self.config.text_model
    }
}

/// Canned responses for tests and local runs without a provider
#[derive(Debug, Clone, Default)]
pub struct MockLanguageModel {
    analysis: String,
    extraction: ExtractedGrades,
    fail: bool,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self {
            analysis: "Class average is steady.".to_string(),
            ..Self::default()
        }
    }

    pub fn with_analysis(mut self, analysis: impl Into<String>) -> Self {
        self.analysis = analysis.into();
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractedGrades) -> Self {
        self.extraction = extraction;
        self
    }

    /// Every call fails as an upstream error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn upstream_failure(&self) -> AppError {
        AppError::AiError {
            message: "mock model unavailable".to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn analyze_results(&self, request: &AnalysisRequest) -> Result<String> {
        if self.fail {
            return Err(self.upstream_failure());
        }
        Ok(format!("{}\n\n{}", request.assignment_title, self.analysis))
    }

    async fn extract_grades(&self, _image: &MarkSheetImage) -> Result<ExtractedGrades> {
        if self.fail {
            return Err(self.upstream_failure());
        }
        Ok(self.extraction.clone())
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn sample_request() -> AnalysisRequest {
        AnalysisRequest {
            grades: vec![
                GradeLine {
                    student_name: "Ada Lovelace".to_string(),
                    marks_obtained: 45.0,
                },
                GradeLine {
                    student_name: "Alan Turing".to_string(),
                    marks_obtained: 38.5,
                },
            ],
            assignment_title: "Midterm".to_string(),
            total_marks: 50.0,
        }
    }

    #[test]
    fn test_analysis_prompt_lists_every_student() {
        let prompt = analysis_prompt(&sample_request());
        assert!(prompt.contains("Assignment: Midterm"));
        assert!(prompt.contains("Total Marks: 50"));
        assert!(prompt.contains("Ada Lovelace: 45/50"));
        assert!(prompt.contains("Alan Turing: 38.5/50"));
        assert!(prompt.contains("3. Students who need attention (below 50%)"));
    }

    #[test]
    fn test_analysis_request_requires_grades_and_total() {
        let mut request = sample_request();
        assert!(request.check().is_ok());

        request.total_marks = 0.0;
        assert!(matches!(request.check(), Err(AppError::Validation { .. })));

        let request = AnalysisRequest {
            grades: vec![],
            assignment_title: "Quiz".to_string(),
            total_marks: 10.0,
        };
        assert!(matches!(request.check(), Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_analysis_request_reads_mixed_case_body() {
        let body = r#"{"grades":[{"student_name":"Ada","marks_obtained":9}],"assignmentTitle":"Quiz","totalMarks":10}"#;
        let request: AnalysisRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.assignment_title, "Quiz");
        assert_eq!(request.grades[0].marks_obtained, 9.0);
    }

    #[test]
    fn test_image_accepts_data_url_and_raw_base64() {
        let encoded = STANDARD.encode(PNG_HEADER);

        let from_url = MarkSheetImage::parse(&format!("data:image/png;base64,{}", encoded)).unwrap();
        assert_eq!(from_url.mime(), "image/png");
        assert_eq!(from_url.size(), PNG_HEADER.len());

        let raw = MarkSheetImage::parse(&encoded).unwrap();
        assert_eq!(raw.mime(), "image/png");
        assert_eq!(raw.data_url(), format!("data:image/png;base64,{}", encoded));
    }

    #[test]
    fn test_image_rejects_bad_input() {
        assert!(matches!(MarkSheetImage::parse(""), Err(AppError::MissingField { .. })));
        assert!(matches!(
            MarkSheetImage::parse("not base64!!"),
            Err(AppError::InvalidFormat { .. })
        ));
        assert!(matches!(
            MarkSheetImage::parse("data:image/png,abcd"),
            Err(AppError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_image_size_limit() {
        let oversized = STANDARD.encode(vec![0u8; MAX_IMAGE_BYTES + 1]);
        match MarkSheetImage::parse(&oversized) {
            Err(AppError::PayloadTooLarge { size, limit }) => {
                assert_eq!(size, MAX_IMAGE_BYTES + 1);
                assert_eq!(limit, MAX_IMAGE_BYTES);
            }
            other => panic!("expected PayloadTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_extraction_strips_fences() {
        let text = "```json\n{\"grades\":[{\"studentName\":\"Ada\",\"marks\":42,\"rollNumber\":\"7\"}],\"totalMarks\":50}\n```";
        let extracted = parse_extraction(text).unwrap();
        assert_eq!(extracted.grades.len(), 1);
        assert_eq!(extracted.grades[0].roll_number.as_deref(), Some("7"));
        assert_eq!(extracted.total_marks, Some(50.0));
        assert_eq!(extracted.subject, None);
    }

    #[test]
    fn test_parse_extraction_rejects_invalid_marks() {
        let text = r#"{"grades":[{"studentName":"Ada","marks":-3}]}"#;
        assert!(matches!(parse_extraction(text), Err(AppError::AiError { .. })));
        assert!(matches!(parse_extraction("no json here"), Err(AppError::AiError { .. })));
    }

    #[tokio::test]
    async fn test_mock_model() {
        let extraction = ExtractedGrades {
            grades: vec![ExtractedGrade {
                student_name: "Ada".to_string(),
                marks: 40.0,
                roll_number: None,
            }],
            subject: Some("Math".to_string()),
            total_marks: Some(50.0),
        };
        let model = MockLanguageModel::new().with_extraction(extraction.clone());
        let image = MarkSheetImage::parse(&STANDARD.encode(PNG_HEADER)).unwrap();

        assert_eq!(model.extract_grades(&image).await.unwrap(), extraction);
        assert!(model.analyze_results(&sample_request()).await.unwrap().starts_with("Midterm"));

        let failing = MockLanguageModel::failing();
        let err = failing.extract_grades(&image).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_fails_before_network() {
        let model = OpenAiCompatibleModel::new(AiConfig::default()).unwrap();
        let err = model.analyze_results(&sample_request()).await.unwrap_err();
        assert!(matches!(err, AppError::AiError { .. }));
    }
}
