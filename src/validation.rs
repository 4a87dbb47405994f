//! Client-side checks run before a form is submitted. Failures here never reach
//! the service.

use crate::{error::ValidationError, profile::ProfileFile};
use regex::Regex;

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_FILE_SIZE_MB: u64 = 1;
pub const MAX_FILE_SIZE_BYTES: u64 = MAX_FILE_SIZE_MB * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email.trim()))
}

/// Trims `email` and rejects it when nothing is left.
///
/// # Errors
/// Returns [`ValidationError::EmptyEmail`] for blank input.
pub fn require_email(email: &str) -> Result<&str, ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyEmail)
    } else {
        Ok(trimmed)
    }
}

/// Checks a new password and its confirmation. Length is counted in
/// characters.
///
/// # Errors
/// Returns [`ValidationError::PasswordTooShort`] first, then
/// [`ValidationError::PasswordMismatch`].
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_CHARS,
        });
    }

    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

/// Checks type before size.
///
/// # Errors
/// Returns [`ValidationError::InvalidFileType`] or
/// [`ValidationError::FileTooLarge`].
pub fn validate_profile_picture(file: &ProfileFile) -> Result<(), ValidationError> {
    let mime = file.mime.trim().to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(ValidationError::InvalidFileType {
            mime: file.mime.clone(),
        });
    }

    if file.size > MAX_FILE_SIZE_BYTES {
        return Err(ValidationError::FileTooLarge {
            size: file.size,
            limit_mb: MAX_FILE_SIZE_MB,
        });
    }

    Ok(())
}
