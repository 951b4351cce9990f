//! Gemini API configuration.

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key. Never logged.
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl GeminiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var          | Required | Default                                            |
    /// |------------------|----------|----------------------------------------------------|
    /// | `GEMINI_API_KEY` | **yes**  | --                                                 |
    /// | `GEMINI_MODEL`   | no       | `gemini-2.0-flash`                                 |
    /// | `GEMINI_API_URL` | no       | `https://generativelanguage.googleapis.com/v1beta` |
    ///
    /// # Panics
    ///
    /// Panics if `GEMINI_API_KEY` is not set or is empty.
    pub fn from_env() -> Self {
        let api_key =
            std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "GEMINI_API_KEY must not be empty");

        Self {
            api_key,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.into())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Full `generateContent` endpoint for the configured model (without key).
    pub fn generate_endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }
}
