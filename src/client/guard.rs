use std::fmt;

use chrono::Utc;
use parking_lot::Mutex;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::watch;

use crate::auth::peek_expiry;
use crate::client::{ClientError, CredentialStore, StoredSession};

/// Rejection codes after which the client must drop its credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    TokenExpired,
    ForceLogout,
    SessionExpired,
    InvalidToken,
}

impl LogoutReason {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TOKEN_EXPIRED" => Some(Self::TokenExpired),
            "FORCE_LOGOUT" => Some(Self::ForceLogout),
            "SESSION_EXPIRED" => Some(Self::SessionExpired),
            "INVALID_TOKEN" => Some(Self::InvalidToken),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::ForceLogout => "FORCE_LOGOUT",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
        }
    }
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TokenExpired => "token expired",
            Self::ForceLogout => "logged out by an administrator",
            Self::SessionExpired => "session expired",
            Self::InvalidToken => "token is invalid",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedIn,
    /// `None` when the holder logged out on purpose.
    SignedOut(Option<LogoutReason>),
}

/// What the guard made of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    /// Local state has been cleared, the user has to log in again.
    LoggedOut(LogoutReason),
    /// An ordinary error, local state is untouched.
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Consumer-side half of the session lifecycle.
///
/// Owns the stored credential, refuses to present one that has expired
/// locally, and clears everything once the server says the session is over.
/// State changes are published on a watch channel so a UI or CLI can send
/// the user back to the login prompt.
pub struct ClientGuard<S: CredentialStore> {
    store: S,
    state: watch::Sender<SessionState>,
    // held across a store operation and the matching state change
    transition: Mutex<()>,
}

impl<S: CredentialStore> ClientGuard<S> {
    pub fn new(store: S) -> Self {
        let initial = match store.load() {
            Ok(Some(_)) => SessionState::SignedIn,
            _ => SessionState::SignedOut(None),
        };
        let (state, _) = watch::channel(initial);
        Self {
            store,
            state,
            transition: Mutex::new(()),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Persist a freshly issued session.
    pub fn remember(&self, session: &StoredSession) -> Result<(), ClientError> {
        let _transition = self.transition.lock();
        self.store.save(session)?;
        self.state.send_replace(SessionState::SignedIn);
        Ok(())
    }

    /// The stored session, provided its credential has not expired locally.
    /// Missing or unreadable state counts as signed out, also when the store
    /// was emptied behind this guard's back.
    pub fn session(&self) -> Option<StoredSession> {
        let _transition = self.transition.lock();
        let session = match self.store.load() {
            Ok(Some(session)) => session,
            Ok(None) => {
                if self.transition_to_signed_out(None) {
                    tracing::info!("Stored session disappeared");
                }
                return None;
            }
            Err(err) => {
                tracing::warn!("Discarding unreadable session: {err}");
                self.discard(Some(LogoutReason::InvalidToken));
                return None;
            }
        };

        match peek_expiry(&session.token) {
            Some(exp) if exp >= Utc::now().timestamp() => Some(session),
            Some(_) => {
                tracing::info!("Stored credential expired locally");
                self.discard(Some(LogoutReason::TokenExpired));
                None
            }
            None => {
                tracing::warn!("Stored credential cannot be parsed");
                self.discard(Some(LogoutReason::InvalidToken));
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.session().map(|session| session.token)
    }

    /// Attach the credential when one is usable, otherwise send the request bare.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub fn inspect(&self, status: StatusCode, body: &[u8]) -> Verdict {
        if status.is_success() {
            return Verdict::Passed;
        }

        let parsed = serde_json::from_slice::<ErrorBody>(body).ok();
        let code = parsed.as_ref().and_then(|body| body.code.clone());
        let message = parsed
            .and_then(|body| body.message)
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
        let message = if message.is_empty() {
            status.canonical_reason().unwrap_or("Unknown status").to_string()
        } else {
            message
        };

        if status == StatusCode::UNAUTHORIZED {
            if let Some(reason) = code.as_deref().and_then(LogoutReason::from_code) {
                self.clear(Some(reason));
                return Verdict::LoggedOut(reason);
            }
        }

        Verdict::Rejected {
            status: status.as_u16(),
            code,
            message,
        }
    }

    /// Drop the stored credential. Safe to call repeatedly, only the first
    /// call after a sign-in publishes a state change. Returns whether it did.
    pub fn clear(&self, reason: Option<LogoutReason>) -> bool {
        let _transition = self.transition.lock();
        self.discard(reason)
    }

    // callers hold `transition`
    fn discard(&self, reason: Option<LogoutReason>) -> bool {
        if let Err(err) = self.store.delete() {
            tracing::warn!("Failed to delete stored session: {err}");
        }
        self.transition_to_signed_out(reason)
    }

    fn transition_to_signed_out(&self, reason: Option<LogoutReason>) -> bool {
        let transitioned = self.state.send_if_modified(|state| match state {
            SessionState::SignedIn => {
                *state = SessionState::SignedOut(reason);
                true
            }
            SessionState::SignedOut(_) => false,
        });

        if transitioned {
            tracing::info!(
                reason = reason.map(|r| r.code()).unwrap_or("LOGOUT"),
                "Admin session cleared"
            );
        }
        transitioned
    }
}
