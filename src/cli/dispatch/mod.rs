//! Maps validated CLI matches to an action plus the shared connection settings.

use crate::cli::{
    actions::{login, password, signup, Action},
    commands::{
        account::{
            ARG_CONFIRM, ARG_EMAIL, ARG_KIND, ARG_PASSWORD, ARG_TOKEN, ARG_USERNAME,
            CMD_FORGOT_PASSWORD, CMD_LOGIN, CMD_RESET_PASSWORD, CMD_SIGNUP,
        },
        ARG_TIMEOUT, ARG_URL,
    },
    globals::GlobalArgs,
};
use crate::session::AccountKind;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

/// # Errors
/// Returns an error if the subcommand or one of its required arguments is missing.
pub fn handler(matches: &ArgMatches) -> Result<(Action, GlobalArgs)> {
    let url = matches
        .get_one::<String>(ARG_URL)
        .cloned()
        .context("missing required argument: --url")?;
    let timeout = matches.get_one::<u64>(ARG_TIMEOUT).copied().unwrap_or(10);
    let globals = GlobalArgs::new(url).with_timeout(timeout);

    let action = match matches.subcommand() {
        Some((CMD_LOGIN, sub_m)) => Action::Login(login::Args {
            email: string(sub_m, ARG_EMAIL)?,
            password: secret(sub_m, ARG_PASSWORD)?,
            kind: kind(sub_m),
        }),
        Some((CMD_SIGNUP, sub_m)) => Action::Signup(signup::Args {
            username: string(sub_m, ARG_USERNAME)?,
            email: string(sub_m, ARG_EMAIL)?,
            password: secret(sub_m, ARG_PASSWORD)?,
            confirm: optional_secret(sub_m, ARG_CONFIRM),
            kind: kind(sub_m),
        }),
        Some((CMD_FORGOT_PASSWORD, sub_m)) => Action::ForgotPassword(password::ForgotArgs {
            email: string(sub_m, ARG_EMAIL)?,
        }),
        Some((CMD_RESET_PASSWORD, sub_m)) => Action::ResetPassword(password::ResetArgs {
            token: secret(sub_m, ARG_TOKEN)?,
            password: secret(sub_m, ARG_PASSWORD)?,
            confirm: optional_secret(sub_m, ARG_CONFIRM),
        }),
        Some((name, _)) => return Err(anyhow!("unknown subcommand: {name}")),
        None => return Err(anyhow!("missing subcommand")),
    };

    Ok((action, globals))
}

fn string(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    string(matches, id).map(SecretString::from)
}

fn optional_secret(matches: &ArgMatches, id: &str) -> Option<SecretString> {
    matches.get_one::<String>(id).cloned().map(SecretString::from)
}

fn kind(matches: &ArgMatches) -> AccountKind {
    matches
        .get_one::<AccountKind>(ARG_KIND)
        .copied()
        .unwrap_or(AccountKind::Consumer)
}
