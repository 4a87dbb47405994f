//! Request and response payloads for the `/consumer/*` endpoints. Request types
//! borrow credentials for the duration of a single call and deliberately do
//! not implement `Debug`, so they cannot end up in log output.

use crate::session::AccountKind;
use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/consumer/login";
pub const SIGNUP_PATH: &str = "/consumer/signup";
pub const FORGOT_PASSWORD_PATH: &str = "/consumer/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/consumer/reset-password";

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub user_type: AccountKind,
}

#[derive(Serialize)]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub user_type: AccountKind,
}

#[derive(Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub new_password: &'a str,
}

/// Account record returned by login and signup.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct IdentityResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub user_type: AccountKind,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
}
