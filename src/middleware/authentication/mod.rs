mod manager;
mod manager_middleware;
pub mod method;

pub use manager::*;
pub use manager_middleware::*;

use crate::auth::{AuthError, SessionCheck, SessionRegistry, TokenCodec};
use crate::models::AuthenticatedAdmin;
use actix_web::dev::ServiceRequest;

/// Evaluate one request: extract, decode, consult the registry, check privilege.
#[tracing::instrument(name = "Authenticate admin request", skip_all)]
pub fn authenticate(
    req: &ServiceRequest,
    cookie_name: &str,
    codec: &TokenCodec,
    registry: &SessionRegistry,
) -> Result<AuthenticatedAdmin, AuthError> {
    let token = method::try_cookie(req, cookie_name)
        .or_else(|| method::try_bearer(req))
        .ok_or(AuthError::Missing)?;

    let claims = codec.decode(&token)?;

    match registry.check(&claims.sub, claims.ver) {
        SessionCheck::Active => {}
        SessionCheck::ForcedLogout => {
            tracing::info!(admin_id = %claims.sub, "Rejecting request: force logout pending");
            return Err(AuthError::ForcedLogout);
        }
        SessionCheck::Revoked => {
            tracing::info!(admin_id = %claims.sub, version = claims.ver, "Rejecting request: credential predates forced logout");
            return Err(AuthError::ForcedLogout);
        }
    }

    if !claims.is_admin {
        tracing::warn!(admin_id = %claims.sub, "Rejecting request: credential lacks admin privilege");
        return Err(AuthError::NotPrivileged);
    }

    Ok(claims.into())
}
