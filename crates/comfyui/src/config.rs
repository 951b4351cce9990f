//! Synthesis engine configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default ComfyUI base URL.
const DEFAULT_API_URL: &str = "http://127.0.0.1:8188";
/// Default delay between history polls.
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Default upper bound on a single synthesis run.
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 600;

/// Connection settings and generation parameters for the ComfyUI engine.
///
/// Generation defaults match the CatVTON reference settings: seed 42,
/// 50 inference steps, guidance 3.5, 768x1024 output.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisConfig {
    pub api_url: String,
    /// Workflow template on disk; `None` uses the built-in CatVTON workflow.
    pub workflow_path: Option<PathBuf>,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub seed: u64,
    pub steps: u32,
    pub guidance: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            workflow_path: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            seed: 42,
            steps: 50,
            guidance: 3.5,
            width: 768,
            height: 1024,
        }
    }
}

impl SynthesisConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `COMFYUI_URL`               | `http://127.0.0.1:8188`  |
    /// | `COMFYUI_WORKFLOW_PATH`     | built-in CatVTON         |
    /// | `COMFYUI_POLL_INTERVAL_MS`  | `1000`                   |
    /// | `COMFYUI_POLL_TIMEOUT_SECS` | `600`                    |
    /// | `TRYON_SEED`                | `42`                     |
    /// | `TRYON_STEPS`               | `50`                     |
    /// | `TRYON_GUIDANCE`            | `3.5`                    |
    /// | `TRYON_WIDTH`               | `768`                    |
    /// | `TRYON_HEIGHT`              | `1024`                   |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let poll_interval_ms: u64 = env_or("COMFYUI_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS);
        let poll_timeout_secs: u64 = env_or("COMFYUI_POLL_TIMEOUT_SECS", DEFAULT_POLL_TIMEOUT_SECS);

        Self {
            api_url: std::env::var("COMFYUI_URL").unwrap_or(defaults.api_url),
            workflow_path: std::env::var("COMFYUI_WORKFLOW_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            poll_interval: Duration::from_millis(poll_interval_ms),
            poll_timeout: Duration::from_secs(poll_timeout_secs),
            seed: env_or("TRYON_SEED", defaults.seed),
            steps: env_or("TRYON_STEPS", defaults.steps),
            guidance: env_or("TRYON_GUIDANCE", defaults.guidance),
            width: env_or("TRYON_WIDTH", defaults.width),
            height: env_or("TRYON_HEIGHT", defaults.height),
        }
    }
}

/// Parse an optional env var, panicking on malformed values.
fn env_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
