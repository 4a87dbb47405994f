use crate::session::{AccountKind, SessionStore};
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub email: String,
    pub password: SecretString,
    pub kind: AccountKind,
}

/// Sign in and render the account as JSON.
/// # Errors
/// Returns an error if the service rejects the credentials or cannot be reached.
pub async fn execute(args: Args, store: &SessionStore) -> Result<String> {
    debug!("login as {} account", args.kind);

    let identity = store
        .authenticate(&args.email, &args.password, args.kind)
        .await?;

    serde_json::to_string_pretty(&identity).context("failed to render account")
}
