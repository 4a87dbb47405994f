//! # Account Session
//!
//! `account-session` is the client side of the consumer/business account
//! service. It covers login, signup and the two-step password reset against the
//! `/consumer/*` HTTP API, and it keeps the authenticated identity in memory.
//!
//! ## Session Store
//!
//! [`SessionStore`] holds at most one [`Identity`] plus an in-progress flag for
//! login and signup. The identity is replaced wholesale on every successful
//! exchange and left untouched on failure. Nothing is persisted; dropping the
//! store ends the session.
//!
//! ## Password Reset
//!
//! Requesting a reset link follows an anti-enumeration policy: every response
//! below `500` is reported as success, so callers cannot learn whether an email
//! is registered. Completing a reset surfaces the service's `detail` message.
//!
//! ## Validation
//!
//! Password rules, profile picture checks and profile change detection run
//! locally in [`validation`] and [`profile`] before anything is sent.

pub mod api;
pub mod cli;
pub mod error;
pub mod profile;
pub mod session;
pub mod validation;

pub use api::ApiClient;
pub use error::{Error, Result, ValidationError};
pub use session::{AccountKind, Identity, SessionStore};

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
