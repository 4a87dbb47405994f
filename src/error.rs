use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The request never produced a structured response: network failure,
    /// timeout, or a body that could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("{0}")]
    Authentication(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Message suitable for showing to the user, without the variant prefix.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(message)
            | Self::Service { message, .. }
            | Self::Authentication(message) => message.clone(),
            Self::Validation(err) => err.to_string(),
        }
    }
}

/// Client-side checks that run before any request is sent.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email address is required.")]
    EmptyEmail,
    #[error("New password must be at least {min} characters long.")]
    PasswordTooShort { min: usize },
    #[error("New password and confirm password do not match.")]
    PasswordMismatch,
    #[error("Invalid file type. Only JPEG, PNG, and WebP images are allowed.")]
    InvalidFileType { mime: String },
    #[error("File size exceeds the maximum limit of {limit_mb}MB.")]
    FileTooLarge { size: u64, limit_mb: u64 },
    #[error("No changes detected.")]
    NoChanges,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_form_copy() {
        assert_eq!(
            ValidationError::PasswordTooShort { min: 8 }.to_string(),
            "New password must be at least 8 characters long."
        );
        assert_eq!(
            ValidationError::FileTooLarge {
                size: 2_000_000,
                limit_mb: 1
            }
            .to_string(),
            "File size exceeds the maximum limit of 1MB."
        );
        assert_eq!(ValidationError::NoChanges.to_string(), "No changes detected.");
    }

    #[test]
    fn user_message_strips_prefixes() {
        let err = Error::Service {
            status: 400,
            message: "Invalid or missing token.".to_string(),
        };
        assert_eq!(err.to_string(), "service error (400): Invalid or missing token.");
        assert_eq!(err.user_message(), "Invalid or missing token.");

        let err = Error::from(ValidationError::PasswordMismatch);
        assert_eq!(
            err.user_message(),
            "New password and confirm password do not match."
        );
    }
}
