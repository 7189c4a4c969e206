//! Common utilities for the file upload handler

use playbox_core::{media_type, AppError};

/// Validate the uploaded filename's extension against the allow-list.
/// Returns the normalized extension (lower case, with dot).
pub fn validate_upload_extension(filename: &str) -> Result<String, AppError> {
    let ext = media_type::extension_of(filename).to_lowercase();

    if !media_type::is_allowed_upload_extension(&ext) {
        return Err(AppError::BadRequest(
            "File type not allowed. Allowed types: png, jpg, jpeg, mp4, gif, mov, mp3".to_string(),
        ));
    }

    Ok(ext)
}
