//! The self-contained rendered artifact.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use checkout_core::AppError;
use serde::{Deserialize, Serialize};

const DATA_URI_PREFIX: &str = "data:application/pdf;base64,";

/// A rendered invoice document, encoded as a portable `data:` URI so it can
/// be stored and retrieved later without re-rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedArtifact {
    data_uri: String,
    size_bytes: usize,
}

impl RenderedArtifact {
    pub(crate) fn from_pdf_bytes(bytes: &[u8]) -> Self {
        Self {
            data_uri: format!("{DATA_URI_PREFIX}{}", STANDARD.encode(bytes)),
            size_bytes: bytes.len(),
        }
    }

    /// The full `data:application/pdf;base64,...` URI.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Size of the underlying PDF in bytes.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Decode the artifact back into raw PDF bytes.
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>, AppError> {
        let encoded = self
            .data_uri
            .strip_prefix(DATA_URI_PREFIX)
            .ok_or_else(|| anyhow::anyhow!("artifact is not a PDF data URI"))?;
        STANDARD
            .decode(encoded)
            .map_err(|e| AppError::Render(anyhow::anyhow!("Failed to decode artifact: {}", e)))
    }
}
