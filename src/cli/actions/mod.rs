pub mod login;
pub mod password;
pub mod signup;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Signup(signup::Args),
    ForgotPassword(password::ForgotArgs),
    ResetPassword(password::ResetArgs),
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute(&globals).await`.
    /// Execute the action against a fresh session store and print its output.
    /// # Errors
    /// Returns an error if local validation or the service call fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}
