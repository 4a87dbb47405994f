use crate::{session::SessionStore, validation::validate_new_password};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

pub const RESET_LINK_SENT: &str =
    "If an account with that email is registered, a password reset link will be sent.";
pub const PASSWORD_RESET: &str = "Your password has been reset. You can now sign in.";

#[derive(Debug)]
pub struct ForgotArgs {
    pub email: String,
}

#[derive(Debug)]
pub struct ResetArgs {
    pub token: SecretString,
    pub password: SecretString,
    pub confirm: Option<SecretString>,
}

/// Request a reset link. The output is the same whether or not the email is
/// registered.
/// # Errors
/// Returns an error only when the reset service fails or cannot be reached.
pub async fn forgot(args: ForgotArgs, store: &SessionStore) -> Result<String> {
    store.request_password_reset(&args.email).await?;
    Ok(RESET_LINK_SENT.to_string())
}

/// Set a new password with a reset token.
/// # Errors
/// Returns an error if the password fails local checks or the service rejects
/// the token.
pub async fn reset(args: ResetArgs, store: &SessionStore) -> Result<String> {
    let password = args.password.expose_secret();
    let confirm = args
        .confirm
        .as_ref()
        .map_or(password, |confirm| confirm.expose_secret());
    validate_new_password(password, confirm)?;

    store
        .complete_password_reset(&args.token, &args.password)
        .await?;

    Ok(PASSWORD_RESET.to_string())
}
