use crate::{session::AccountKind, validation::valid_email};
use clap::{builder::ValueParser, Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_SIGNUP: &str = "signup";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM: &str = "confirm";
pub const ARG_KIND: &str = "kind";
pub const ARG_USERNAME: &str = "username";
pub const ARG_TOKEN: &str = "token";

#[must_use]
pub fn validator_email() -> ValueParser {
    ValueParser::from(move |email: &str| -> std::result::Result<String, String> {
        if valid_email(email) {
            Ok(email.trim().to_string())
        } else {
            Err("invalid email address".to_string())
        }
    })
}

#[must_use]
pub fn validator_kind() -> ValueParser {
    ValueParser::from(move |kind: &str| kind.parse::<AccountKind>())
}

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email address")
        .env("ACCOUNT_SESSION_EMAIL")
        .required(true)
        .value_parser(validator_email())
}

fn password_arg(env: &'static str) -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long("password")
        .help("Account password")
        .env(env)
        .hide_env_values(true)
        .required(true)
}

fn confirm_arg() -> Arg {
    Arg::new(ARG_CONFIRM)
        .long("confirm")
        .help("Password confirmation, must match --password")
        .env("ACCOUNT_SESSION_CONFIRM_PASSWORD")
        .hide_env_values(true)
}

fn kind_arg() -> Arg {
    Arg::new(ARG_KIND)
        .short('k')
        .long("kind")
        .help("Account kind: consumer or business")
        .env("ACCOUNT_SESSION_KIND")
        .default_value("consumer")
        .value_parser(validator_kind())
}

#[must_use]
pub fn login() -> Command {
    Command::new(CMD_LOGIN)
        .about("Sign in and print the account")
        .arg(email_arg())
        .arg(password_arg("ACCOUNT_SESSION_PASSWORD"))
        .arg(kind_arg())
}

#[must_use]
pub fn signup() -> Command {
    Command::new(CMD_SIGNUP)
        .about("Create an account and print it")
        .arg(
            Arg::new(ARG_USERNAME)
                .short('n')
                .long("username")
                .help("Display name")
                .env("ACCOUNT_SESSION_USERNAME")
                .required(true),
        )
        .arg(email_arg())
        .arg(password_arg("ACCOUNT_SESSION_PASSWORD"))
        .arg(confirm_arg())
        .arg(kind_arg())
}

#[must_use]
pub fn forgot_password() -> Command {
    Command::new(CMD_FORGOT_PASSWORD)
        .about("Request a password reset link")
        .arg(email_arg())
}

#[must_use]
pub fn reset_password() -> Command {
    Command::new(CMD_RESET_PASSWORD)
        .about("Set a new password with a reset token")
        .arg(
            Arg::new(ARG_TOKEN)
                .long("token")
                .help("Reset token from the email link")
                .env("ACCOUNT_SESSION_RESET_TOKEN")
                .hide_env_values(true)
                .required(true),
        )
        .arg(password_arg("ACCOUNT_SESSION_NEW_PASSWORD"))
        .arg(confirm_arg())
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(login())
        .subcommand(signup())
        .subcommand(forgot_password())
        .subcommand(reset_password())
}
