use crate::auth::{DecodeError, IssueError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an admin credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin identity.
    pub sub: String,
    pub email: String,
    pub is_admin: bool,
    /// Session generation of `sub` at issue time. Credentials older than the
    /// registry's current generation are revoked.
    pub ver: u64,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 credentials with a process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(
        &self,
        identity: &str,
        email: &str,
        is_privileged: bool,
        version: u64,
    ) -> Result<String, IssueError> {
        self.issue_at(identity, email, is_privileged, version, Utc::now())
    }

    /// Same as [`TokenCodec::issue`] with an explicit issue time.
    pub fn issue_at(
        &self,
        identity: &str,
        email: &str,
        is_privileged: bool,
        version: u64,
        now: DateTime<Utc>,
    ) -> Result<String, IssueError> {
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or(IssueError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: identity.to_string(),
            email: email.to_string(),
            is_admin: is_privileged,
            ver: version,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify signature, structure and expiry. Never panics on untrusted input.
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| {
                tracing::debug!("credential rejected: {:?}", err.kind());
                DecodeError::from(err)
            })?;

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: i64,
}

/// Read the `exp` claim without verifying the signature.
///
/// Holders of a credential cannot verify it, they only need to know when to
/// stop presenting it. Any parse failure yields `None`.
pub fn peek_expiry(token: &str) -> Option<i64> {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice::<ExpiryClaim>(&decoded)
        .ok()
        .map(|claim| claim.exp)
}
