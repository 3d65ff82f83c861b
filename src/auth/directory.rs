use crate::models::AdminProfile;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Admin account as configured under `admins:`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    /// argon2 PHC string, see `gatekeeper hash-password`
    pub password_hash: String,
    #[serde(default = "default_is_admin")]
    pub is_admin: bool,
}

fn default_is_admin() -> bool {
    true
}

impl AdminAccount {
    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        let parsed = match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::error!(admin_id = %self.id, "stored password hash is unreadable: {err}");
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Lookup of admin accounts, injected into the login handler.
pub trait AdminDirectory: Send + Sync {
    fn find_by_email(&self, email: &str) -> Option<AdminAccount>;
    fn find_by_id(&self, id: &str) -> Option<AdminAccount>;

    /// The account behind `email` if `password` matches. Unknown addresses
    /// still pay for one argon2 verification. Blocking, keep it off the
    /// async workers.
    fn verify_credentials(&self, email: &str, password: &str) -> Option<AdminAccount> {
        match self.find_by_email(email) {
            Some(account) if account.verify_password(password) => Some(account),
            Some(_) => None,
            None => {
                burn_verification(password);
                None
            }
        }
    }
}

fn burn_verification(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash_password("unknown-admin-placeholder").ok());
    if let Some(parsed) = dummy.as_deref().and_then(|hash| PasswordHash::new(hash).ok()) {
        let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
    }
}

#[derive(Default)]
pub struct InMemoryAdminDirectory {
    by_email: HashMap<String, AdminAccount>,
}

impl InMemoryAdminDirectory {
    pub fn new(accounts: impl IntoIterator<Item = AdminAccount>) -> Self {
        let by_email = accounts
            .into_iter()
            .map(|account| (account.email.trim().to_lowercase(), account))
            .collect();
        Self { by_email }
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

impl AdminDirectory for InMemoryAdminDirectory {
    fn find_by_email(&self, email: &str) -> Option<AdminAccount> {
        self.by_email.get(&email.trim().to_lowercase()).cloned()
    }

    fn find_by_id(&self, id: &str) -> Option<AdminAccount> {
        self.by_email
            .values()
            .find(|account| account.id == id)
            .cloned()
    }
}

/// Produce an argon2id PHC string for the `admins:` configuration.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())?;
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}
