use crate::auth::Claims;
use serde::{Deserialize, Serialize};

/// Public view of an admin account, returned by login and token validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Identity attached to a request by the auth gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub id: String,
    pub email: String,
    pub claims: Claims,
}

impl From<Claims> for AuthenticatedAdmin {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            claims,
        }
    }
}
