use crate::{
    session::{AccountKind, SessionStore},
    validation::validate_new_password,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm: Option<SecretString>,
    pub kind: AccountKind,
}

/// Create an account and render it as JSON.
/// # Errors
/// Returns an error if the password fails local checks, or the service
/// rejects the signup or cannot be reached.
pub async fn execute(args: Args, store: &SessionStore) -> Result<String> {
    let password = args.password.expose_secret();
    let confirm = args
        .confirm
        .as_ref()
        .map_or(password, |confirm| confirm.expose_secret());
    validate_new_password(password, confirm)?;

    let identity = store
        .register(&args.username, &args.email, &args.password, args.kind)
        .await?;

    serde_json::to_string_pretty(&identity).context("failed to render account")
}
