pub mod account;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_URL: &str = "url";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("account-session")
        .about("Consumer and business account sessions")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_URL)
                .short('u')
                .long("url")
                .help("Account service base URL")
                .default_value("http://localhost:8001")
                .env("ACCOUNT_SESSION_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long("timeout")
                .help("Request timeout in seconds, 0 disables it")
                .default_value("10")
                .env("ACCOUNT_SESSION_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        );

    let command = account::with_subcommands(command);
    logging::with_args(command)
}
