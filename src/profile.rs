//! Profile edit form state. The form keeps a pending picture only after it
//! passes validation and turns the fields into a [`ProfileChanges`] set on
//! submit. Sending the changes is left to the caller.

use crate::{
    error::ValidationError,
    validation::{validate_new_password, validate_profile_picture},
};
use secrecy::{ExposeSecret, SecretString};

/// Metadata of a picture chosen for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl ProfileFile {
    #[must_use]
    pub fn new(name: &str, mime: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.to_string(),
            size,
        }
    }
}

/// Fields that changed, ready to submit.
#[derive(Debug)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub profile_pic: Option<ProfileFile>,
}

#[derive(Debug)]
pub struct ProfileForm {
    current_username: String,
    pub username: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pending_file: Option<ProfileFile>,
    file_error: Option<ValidationError>,
}

impl ProfileForm {
    /// Starts a form with the username field prefilled.
    #[must_use]
    pub fn new(current_username: &str) -> Self {
        Self {
            current_username: current_username.to_string(),
            username: current_username.to_string(),
            password: SecretString::default(),
            confirm_password: SecretString::default(),
            pending_file: None,
            file_error: None,
        }
    }

    #[must_use]
    pub fn pending_file(&self) -> Option<&ProfileFile> {
        self.pending_file.as_ref()
    }

    #[must_use]
    pub fn file_error(&self) -> Option<&ValidationError> {
        self.file_error.as_ref()
    }

    /// Replaces the file selection. An invalid file leaves nothing pending.
    ///
    /// # Errors
    /// Returns the validation failure for a rejected file; it is also kept as
    /// the form's file error until the next selection.
    pub fn select_file(&mut self, file: Option<ProfileFile>) -> Result<(), ValidationError> {
        self.file_error = None;
        self.pending_file = None;

        let Some(file) = file else {
            return Ok(());
        };

        if let Err(err) = validate_profile_picture(&file) {
            self.file_error = Some(err.clone());
            return Err(err);
        }

        self.pending_file = Some(file);
        Ok(())
    }

    /// Validates the form and collects the changed fields.
    ///
    /// # Errors
    /// Returns an outstanding file error, a password rule failure, or
    /// [`ValidationError::NoChanges`] when nothing would be sent.
    pub fn submit(&self) -> Result<ProfileChanges, ValidationError> {
        if let Some(err) = &self.file_error {
            return Err(err.clone());
        }

        let password = self.password.expose_secret();
        let changing_password = !password.is_empty();
        if changing_password {
            validate_new_password(password, self.confirm_password.expose_secret())?;
        }

        let username = self.username.trim();
        let username = (username != self.current_username && !username.is_empty())
            .then(|| username.to_string());

        let changes = ProfileChanges {
            username,
            password: changing_password.then(|| SecretString::from(password.to_string())),
            profile_pic: self.pending_file.clone(),
        };

        if changes.username.is_none() && changes.password.is_none() && changes.profile_pic.is_none()
        {
            return Err(ValidationError::NoChanges);
        }

        Ok(changes)
    }
}
