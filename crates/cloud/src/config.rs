//! Cloudinary account configuration.

/// Default folder uploaded assets are placed in.
const DEFAULT_FOLDER: &str = "virtual-tryon";
/// Default Cloudinary API host.
const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Credentials and placement settings for a Cloudinary product environment.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    /// Signing secret. Never logged.
    pub api_secret: String,
    /// Folder every upload is placed in.
    pub folder: String,
    /// API host, overridable for tests.
    pub api_base: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CloudinaryConfig {
    /// Load Cloudinary configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default                      |
    /// |-------------------------|----------|------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME` | **yes**  | --                           |
    /// | `CLOUDINARY_API_KEY`    | **yes**  | --                           |
    /// | `CLOUDINARY_API_SECRET` | **yes**  | --                           |
    /// | `CLOUDINARY_FOLDER`     | no       | `virtual-tryon`              |
    /// | `CLOUDINARY_API_BASE`   | no       | `https://api.cloudinary.com` |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        Self {
            cloud_name: required("CLOUDINARY_CLOUD_NAME"),
            api_key: required("CLOUDINARY_API_KEY"),
            api_secret: required("CLOUDINARY_API_SECRET"),
            folder: std::env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| DEFAULT_FOLDER.into()),
            api_base: std::env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.into())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Endpoint for an image action such as `upload` or `destroy`.
    pub fn image_endpoint(&self, action: &str) -> String {
        format!("{}/v1_1/{}/image/{action}", self.api_base, self.cloud_name)
    }
}

fn required(name: &str) -> String {
    let value = std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set in the environment"));
    assert!(!value.is_empty(), "{name} must not be empty");
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "1234".into(),
            api_secret: "shh".into(),
            folder: DEFAULT_FOLDER.into(),
            api_base: DEFAULT_API_BASE.into(),
        }
    }

    #[test]
    fn endpoint_includes_cloud_and_action() {
        assert_eq!(
            sample().image_endpoint("destroy"),
            "https://api.cloudinary.com/v1_1/demo/image/destroy"
        );
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("shh"));
        assert!(rendered.contains("<redacted>"));
    }
}
