use ticketpay_upload::MAX_RECEIPT_SIZE_BYTES;

/// Request bodies above this are refused before the handler runs. Kept above
/// the receipt ceiling so a slightly oversized receipt still gets the
/// validation error rather than a bare 413.
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * MAX_RECEIPT_SIZE_BYTES;

pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";
pub const DOCS_PATH: &str = "/docs";
