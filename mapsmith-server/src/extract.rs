//! PDF → plain text boundary.
//!
//! Extraction is a single external library call; everything downstream of
//! this function only ever sees plain text.

use thiserror::Error;

/// Failure to pull text out of an uploaded document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),
}

/// Extracts the full plain text of a PDF held in memory.
///
/// The text may still be blank for image-only documents; callers decide
/// what blank means for them.
pub fn pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|err| ExtractError::Pdf(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_extraction() {
        let err = pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
