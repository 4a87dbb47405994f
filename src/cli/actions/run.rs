use crate::cli::{
    actions::{login, password, signup, Action},
    globals::GlobalArgs,
};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
// To add a new action, add a new `Action::*` variant and a corresponding `*::execute` call here.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    let store = globals.session_store()?;

    let output = match action {
        Action::Login(args) => login::execute(args, &store).await?,
        Action::Signup(args) => signup::execute(args, &store).await?,
        Action::ForgotPassword(args) => password::forgot(args, &store).await?,
        Action::ResetPassword(args) => password::reset(args, &store).await?,
    };

    println!("{output}");

    Ok(())
}
