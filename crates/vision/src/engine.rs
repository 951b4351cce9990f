//! Gemini `generateContent` client implementing [`FeedbackEngine`].

use std::path::Path;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use vton_core::error::CoreError;
use vton_core::feedback::{FeedbackEngine, FEEDBACK_SERVICE};
use vton_core::image_format::mime_for_image;

use crate::config::GeminiConfig;
use crate::response::{generation_error, parse_model_output};

/// Instruction sent alongside every image. The model is asked to answer with
/// a bare JSON object carrying `feedback`, `recommendations` and
/// `overall_score`.
pub const FEEDBACK_PROMPT: &str = r#"Bạn là một chuyên gia tư vấn thời trang chuyên nghiệp. Hãy cung cấp phản hồi chi tiết và hữu ích về hình ảnh thử đồ ảo này.
Phân tích kỹ lưỡng độ vừa vặn, sự phối hợp màu sắc và phong cách tổng thể. Đề xuất những cải tiến tiềm năng hoặc các lựa chọn thay thế.
Hãy đưa ra nhận xét cụ thể, mang tính xây dựng và thể hiện sự tinh tế trong chuyên môn.

Đầu ra PHẢI là một JSON hợp lệ theo định dạng này:
{
    "feedback": "Nhận xét chi tiết về trang phục",
    "recommendations": ["Đề xuất 1", "Đề xuất 2", "Đề xuất 3"],
    "overall_score": [1 đến 10]
}

Chỉ trả về JSON, không thêm văn bản nào khác. Đảm bảo JSON hợp lệ và có đầy đủ các trường."#;

/// Errors from the Gemini API layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The response carried no text part (e.g. blocked by safety filters).
    #[error("Gemini returned no text")]
    EmptyResponse,

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GeminiError> for CoreError {
    fn from(err: GeminiError) -> Self {
        CoreError::dependency(FEEDBACK_SERVICE, err)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Fashion critic backed by a Gemini multimodal model.
pub struct GeminiFeedbackEngine {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiFeedbackEngine {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Send the image and return the model's raw text answer.
    pub async fn generate_text(&self, image_path: &Path) -> Result<String, GeminiError> {
        let bytes = tokio::fs::read(image_path).await?;
        let extension = image_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        let body = request_body(&bytes, mime_for_image(&bytes, &extension));

        let response = self
            .client
            .post(self.config.generate_endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.text().ok_or(GeminiError::EmptyResponse)
    }
}

/// Build a `generateContent` request with the prompt followed by the image.
fn request_body(image: &[u8], mime_type: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "text": FEEDBACK_PROMPT },
                { "inline_data": { "mime_type": mime_type, "data": BASE64.encode(image) } }
            ]
        }]
    })
}

#[async_trait]
impl FeedbackEngine for GeminiFeedbackEngine {
    async fn critique(&self, image_path: &Path) -> Result<Value, CoreError> {
        match self.generate_text(image_path).await {
            Ok(text) => Ok(parse_model_output(&text)),
            Err(err) => {
                tracing::error!(error = %err, model = %self.config.model, "Feedback generation failed");
                Ok(generation_error(err))
            }
        }
    }
}
