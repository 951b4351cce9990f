//! Try-on image synthesis contract.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Service name reported in [`CoreError::Dependency`] for synthesis faults.
pub const SYNTHESIS_SERVICE: &str = "Image synthesis";

/// Body region the garment occupies, used to build the inpainting mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothRegion {
    #[default]
    Upper,
    Lower,
    Overall,
}

impl ClothRegion {
    /// Value understood by the masking model.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Overall => "overall",
        }
    }
}

impl FromStr for ClothRegion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "overall" => Ok(Self::Overall),
            other => Err(CoreError::Validation(format!(
                "Unknown cloth_type '{other}'. Must be one of: upper, lower, overall"
            ))),
        }
    }
}

/// Generates a composite image of a person wearing a garment.
#[async_trait]
pub trait TryOnSynthesizer: Send + Sync {
    /// Synthesize a try-on image and return the path of the written result.
    ///
    /// The result is written inside `output_dir`; the caller owns the file
    /// from then on and is responsible for removing it.
    async fn synthesize(
        &self,
        person_image: &Path,
        cloth_image: &Path,
        region: ClothRegion,
        output_dir: &Path,
    ) -> Result<PathBuf, CoreError>;
}
