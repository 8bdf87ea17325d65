use std::path::Path;

/// Receipt size ceiling (5 MiB).
pub const MAX_RECEIPT_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted receipt extensions, lower-case, without the dot.
pub const RECEIPT_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "pdf"];

/// Accepted declared media types.
pub const RECEIPT_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// Receipt validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Only JPEG, PNG, and PDF files are allowed (extension '{extension}' is not)")]
    InvalidExtension { extension: String },

    #[error("Only JPEG, PNG, and PDF files are allowed (content type '{content_type}' is not)")]
    InvalidContentType { content_type: String },

    #[error(
        "Only JPEG, PNG, and PDF files are allowed (content type '{content_type}' does not match extension '{extension}')"
    )]
    ContentTypeMismatch {
        extension: String,
        content_type: String,
    },

    #[error("Only JPEG, PNG, and PDF files are allowed (file '{0}' has no extension)")]
    MissingExtension(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Receipt file validator
///
/// Both the declared extension and the declared media type must be on the
/// allow-list, and they must agree with each other.
#[derive(Clone, Debug)]
pub struct ReceiptValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl Default for ReceiptValidator {
    fn default() -> Self {
        Self::new(
            MAX_RECEIPT_SIZE_BYTES,
            RECEIPT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            RECEIPT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl ReceiptValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Run every check; the first failure wins.
    pub fn validate(
        &self,
        size: usize,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        self.validate_file_size(size)?;
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        self.validate_extension_content_type_match(filename, content_type)
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = extension_of(filename)?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension { extension });
        }

        Ok(())
    }

    /// Validate content type. Parameters such as `; charset=` are ignored.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_mime_type(content_type);

        if !self.allowed_content_types.iter().any(|ct| *ct == normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Validate that the declared Content-Type matches the file extension
    pub fn validate_extension_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let extension = extension_of(filename)?;
        let normalized = normalize_mime_type(content_type);

        let expected_content_types: &[&str] = match extension.as_str() {
            "jpg" | "jpeg" => &["image/jpeg", "image/jpg"],
            "png" => &["image/png"],
            "pdf" => &["application/pdf"],
            _ => &[],
        };

        if !expected_content_types.contains(&normalized.as_str()) {
            return Err(ValidationError::ContentTypeMismatch {
                extension,
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }
}

fn extension_of(filename: &str) -> Result<String, ValidationError> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))
}

/// Strip MIME parameters (e.g. "image/png; name=x" -> "image/png") and lower-case.
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}
