use actix_web::{dev::ServiceRequest, HttpMessage};

/// Credential from the HTTP-only session cookie. An emptied cookie counts as absent.
#[tracing::instrument(name = "Read credential from cookie", skip(req))]
pub fn try_cookie(req: &ServiceRequest, cookie_name: &str) -> Option<String> {
    let cookie = req.cookie(cookie_name)?;
    let token = cookie.value().trim();
    if token.is_empty() {
        return None;
    }

    tracing::debug!("Found {cookie_name} in cookies");
    Some(token.to_string())
}
