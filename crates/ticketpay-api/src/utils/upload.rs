//! Multipart extraction for payment submissions

use crate::error::HttpAppError;
use crate::services::PaymentSubmission;
use axum::extract::Multipart;
use ticketpay_core::{AppError, FileReference};
use ticketpay_upload::UploadedFile;

pub const VIOLATION_ID_FIELD: &str = "violation_id";
pub const PAYMENT_AMOUNT_FIELD: &str = "payment_amount";
pub const RECEIPT_FIELD: &str = "receipt";

/// Read the submission fields from a multipart body.
///
/// Unknown fields are skipped. Only one `receipt` part is accepted. A receipt
/// part with neither a filename nor any bytes is treated as absent, which is
/// what browsers send for an empty file input.
pub async fn extract_payment_form(mut multipart: Multipart) -> Result<PaymentSubmission, HttpAppError> {
    let mut submission = PaymentSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            VIOLATION_ID_FIELD => submission.violation_id = Some(field.text().await?),
            PAYMENT_AMOUNT_FIELD => submission.payment_amount = Some(field.text().await?),
            RECEIPT_FIELD => {
                if submission.receipt.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple receipt fields are not allowed; send exactly one field named 'receipt'"
                            .to_string(),
                    )
                    .into());
                }

                let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await?;

                if filename.is_empty() && data.is_empty() {
                    continue;
                }

                submission.receipt = Some(UploadedFile::new(data, filename, content_type));
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unexpected multipart field");
            }
        }
    }

    Ok(submission)
}

/// Media type to serve a stored receipt with, from its extension.
pub fn content_type_for_reference(reference: &FileReference) -> &'static str {
    let extension = reference
        .as_str()
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_reference() {
        let cases = [
            ("receipt-1-1.png", "image/png"),
            ("receipt-1-1.jpg", "image/jpeg"),
            ("receipt-1-1.jpeg", "image/jpeg"),
            ("receipt-1-1.pdf", "application/pdf"),
            ("receipt-1-1", "application/octet-stream"),
        ];
        for (reference, expected) in cases {
            assert_eq!(content_type_for_reference(&FileReference::new(reference)), expected);
        }
    }
}
