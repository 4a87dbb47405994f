//! In-memory session state for the account service. The store owns the
//! current [`Identity`] and a loading flag for login and signup, and it is the
//! only place either is written. Clones share the same state, so UI layers can
//! hold a handle and read snapshots while an exchange is in flight.
//!
//! Flow Overview: login and signup replace the identity only after a complete
//! success response; any failure leaves it as it was. Logout is local. The
//! password reset calls never touch the identity.

use crate::{
    api::{
        types::{
            ForgotPasswordRequest, IdentityResponse, LoginRequest, ResetPasswordRequest,
            SignupRequest, FORGOT_PASSWORD_PATH, LOGIN_PATH, RESET_PASSWORD_PATH, SIGNUP_PATH,
        },
        ApiClient,
    },
    error::{Error, Result},
    validation::require_email,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::{error, info, instrument, warn};

const LOGIN_FAILED: &str = "Login failed.";
const SIGNUP_FAILED: &str = "Failed to create account via API.";
const RESET_FAILED: &str = "Password reset failed.";
/// Returned for every reset-request failure so the cause is never revealed.
const RESET_REQUEST_FAILED: &str = "Failed to connect to the reset service.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Consumer,
    Business,
}

impl AccountKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "consumer" => Ok(Self::Consumer),
            "business" => Ok(Self::Business),
            other => Err(format!("unknown account kind: {other}")),
        }
    }
}

/// The authenticated principal. Contains no secrets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub kind: AccountKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

impl From<IdentityResponse> for Identity {
    fn from(response: IdentityResponse) -> Self {
        Self {
            id: response.id,
            email: response.email,
            username: response.username,
            kind: response.user_type,
            created_at: response.created_at,
            profile_pic: response.profile_pic,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Identity>,
    loading: bool,
}

/// Sets the loading flag on creation and clears it when dropped, so every
/// exit path of an exchange resets it.
struct LoadingGuard<'a> {
    state: &'a RwLock<SessionState>,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a RwLock<SessionState>) -> Self {
        write(state).loading = true;
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        write(self.state).loading = false;
    }
}

// The state is plain data and every write leaves it consistent, so a poisoned
// lock is still safe to use.
fn read(state: &RwLock<SessionState>) -> RwLockReadGuard<'_, SessionState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(state: &RwLock<SessionState>) -> RwLockWriteGuard<'_, SessionState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    state: Arc<RwLock<SessionState>>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = read(&self.state);
        f.debug_struct("SessionStore")
            .field("base_url", &self.api.base_url())
            .field("authenticated", &state.identity.is_some())
            .field("loading", &state.loading)
            .finish()
    }
}

impl SessionStore {
    /// Creates a logged-out store.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Snapshot of the current identity.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        read(&self.state).identity.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        read(&self.state).identity.is_some()
    }

    /// True while a login or signup exchange is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        read(&self.state).loading
    }

    /// Verifies credentials and replaces the held identity on success.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for a blank email, [`Error::Transport`]
    /// when the service cannot be reached, and [`Error::Authentication`] when
    /// the service rejects the login or answers without a usable identity.
    #[instrument(skip(self, email, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
        kind: AccountKind,
    ) -> Result<Identity> {
        let email = require_email(email)?;
        let request = LoginRequest {
            email,
            password: password.expose_secret(),
            user_type: kind,
        };

        self.exchange(LOGIN_PATH, &request, LOGIN_FAILED).await
    }

    /// Creates an account and holds the new identity on success.
    ///
    /// # Errors
    /// Same as [`SessionStore::authenticate`].
    #[instrument(skip(self, username, email, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
        kind: AccountKind,
    ) -> Result<Identity> {
        let email = require_email(email)?;
        let request = SignupRequest {
            username,
            email,
            password: password.expose_secret(),
            user_type: kind,
        };

        self.exchange(SIGNUP_PATH, &request, SIGNUP_FAILED).await
    }

    /// Drops the held identity. Local only.
    pub fn clear_session(&self) {
        write(&self.state).identity = None;
        info!("session cleared");
    }

    /// Asks the service to email a reset link.
    ///
    /// Any status below `500` counts as success whether or not the address is
    /// registered.
    ///
    /// # Errors
    /// Returns [`Error::Service`] for a `5xx` status and [`Error::Transport`]
    /// when the service cannot be reached, both with a generic message.
    #[instrument(skip(self, email))]
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let email = require_email(email)?;

        match self
            .api
            .post_json(FORGOT_PASSWORD_PATH, &ForgotPasswordRequest { email })
            .await
        {
            Ok(response) if response.status.is_server_error() => {
                error!("Password reset request failed: {}", response.status);
                Err(Error::Service {
                    status: response.status.as_u16(),
                    message: RESET_REQUEST_FAILED.to_string(),
                })
            }
            Ok(_) => Ok(()),
            Err(err) => {
                error!("Password reset request failed: {err}");
                Err(Error::Transport(RESET_REQUEST_FAILED.to_string()))
            }
        }
    }

    /// Sets a new password using a reset token.
    ///
    /// # Errors
    /// Returns [`Error::Service`] with the service's `detail` when the reset is
    /// rejected, and the underlying [`Error::Transport`] when the service
    /// cannot be reached.
    #[instrument(skip(self, token, new_password))]
    pub async fn complete_password_reset(
        &self,
        token: &SecretString,
        new_password: &SecretString,
    ) -> Result<()> {
        let request = ResetPasswordRequest {
            token: token.expose_secret(),
            new_password: new_password.expose_secret(),
        };

        let response = self
            .api
            .post_json(RESET_PASSWORD_PATH, &request)
            .await
            .inspect_err(|err| error!("Password reset failed: {err}"))?;

        if !response.is_success() {
            let message = response.detail().unwrap_or_else(|| RESET_FAILED.to_string());
            warn!("Password reset rejected: {} - {}", response.status, message);
            return Err(Error::Service {
                status: response.status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    async fn exchange<B: Serialize>(
        &self,
        path: &str,
        request: &B,
        fallback: &str,
    ) -> Result<Identity> {
        let _loading = LoadingGuard::start(&self.state);

        let response = self.api.post_json(path, request).await?;

        if !response.is_success() {
            let message = response.detail().unwrap_or_else(|| fallback.to_string());
            warn!("{} - {}, {}", path, response.status, message);
            return Err(Error::Authentication(message));
        }

        let Some(identity) = response.json::<IdentityResponse>().map(Identity::from) else {
            warn!("{} - {}, response is missing identity fields", path, response.status);
            return Err(Error::Authentication(fallback.to_string()));
        };

        write(&self.state).identity = Some(identity.clone());
        info!(user_id = identity.id, kind = %identity.kind, "session established");

        Ok(identity)
    }
}

#[cfg(test)]
mod tests;
