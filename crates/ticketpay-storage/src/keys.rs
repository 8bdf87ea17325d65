//! Receipt name generation shared by every backend.
//!
//! Format: `receipt-{unix millis}-{random 0..=1e9}{.ext}`. Uniqueness comes from
//! the timestamp plus random suffix; there is no exclusive-create step.

use chrono::Utc;
use rand::Rng;
use std::path::Path;

const RECEIPT_PREFIX: &str = "receipt";
const RANDOM_SUFFIX_MAX: u64 = 1_000_000_000;
const MAX_EXTENSION_LEN: usize = 10;

/// Generate a new receipt name for an upload called `original_filename`.
pub fn generate_receipt_name(original_filename: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u64 = rand::rng().random_range(0..=RANDOM_SUFFIX_MAX);
    format!(
        "{}-{}-{}{}",
        RECEIPT_PREFIX,
        millis,
        suffix,
        normalized_extension(original_filename)
    )
}

/// Lower-cased extension of `filename` including the leading dot, or an empty
/// string when there is none or it is not plain alphanumeric.
pub fn normalized_extension(filename: &str) -> String {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    if extension.is_empty()
        || extension.len() > MAX_EXTENSION_LEN
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return String::new();
    }

    format!(".{}", extension.to_lowercase())
}

/// Reject references that could escape the storage directory.
pub(crate) fn validate_key(key: &str) -> bool {
    !key.is_empty()
        && !key.contains("..")
        && !key.contains('/')
        && !key.contains('\\')
        && !key.starts_with('.')
}
