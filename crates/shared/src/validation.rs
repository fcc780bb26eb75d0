//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum size of an uploaded model file in bytes (50 MB).
pub const MAX_MODEL_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// File extensions accepted for uploaded 3D models.
pub const ALLOWED_MODEL_EXTENSIONS: &[&str] = &["stl", "obj", "3mf"];

lazy_static! {
    static ref COUPON_CODE_RE: Regex = Regex::new(r"^[A-Z0-9_-]{2,32}$").unwrap();
}

/// Validates an uploaded model file name against the extension allow-list.
///
/// The comparison is case-insensitive (`Benchy.STL` is accepted).
pub fn validate_model_file_name(file_name: &str) -> Result<(), ValidationError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.to_ascii_lowercase()));

    match extension {
        Some((stem, ext)) if !stem.is_empty() && ALLOWED_MODEL_EXTENSIONS.contains(&ext.as_str()) => {
            Ok(())
        }
        _ => {
            let mut err = ValidationError::new("file_extension");
            err.message = Some("File must be one of: .stl, .obj, .3mf".into());
            Err(err)
        }
    }
}

/// Validates an uploaded model file size against the ceiling.
pub fn validate_model_file_size(size_bytes: u64) -> Result<(), ValidationError> {
    if size_bytes == 0 {
        let mut err = ValidationError::new("file_empty");
        err.message = Some("Uploaded file is empty".into());
        return Err(err);
    }
    if size_bytes > MAX_MODEL_FILE_BYTES {
        let mut err = ValidationError::new("file_too_large");
        err.message = Some("File exceeds the 50 MB limit".into());
        return Err(err);
    }
    Ok(())
}

/// Normalizes a coupon code for lookup and storage.
///
/// Codes are case-insensitive; the canonical form is uppercase with
/// surrounding whitespace removed.
pub fn normalize_coupon_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Validates a (normalized) coupon code against the allowed charset.
pub fn validate_coupon_code(code: &str) -> Result<(), ValidationError> {
    if COUPON_CODE_RE.is_match(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("coupon_code_format");
        err.message =
            Some("Coupon code must be 2-32 characters: letters, digits, '-' or '_'".into());
        Err(err)
    }
}
