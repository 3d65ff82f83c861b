use actix_web::dev::ServiceRequest;
use actix_web::http::header::AUTHORIZATION;

/// Split `Bearer <token>`, any other scheme is not ours.
pub fn extract_bearer_token(authorization: &str) -> Result<&str, String> {
    let parts: Vec<&str> = authorization.split_whitespace().collect();
    if parts.len() != 2 {
        return Err("Invalid Authorization header format".to_string());
    }
    if parts[0] != "Bearer" {
        return Err("Expected Bearer scheme in Authorization header".to_string());
    }
    Ok(parts[1])
}

/// Credential from `Authorization: Bearer`, the fallback for client-held copies.
#[tracing::instrument(name = "Read credential from Authorization header", skip(req))]
pub fn try_bearer(req: &ServiceRequest) -> Option<String> {
    let authorization = match req.headers().get(AUTHORIZATION)?.to_str() {
        Ok(value) => value,
        Err(_) => {
            tracing::debug!("Authorization header is not visible ASCII");
            return None;
        }
    };

    match extract_bearer_token(authorization) {
        Ok(token) => Some(token.to_string()),
        Err(err) => {
            tracing::debug!("{err}");
            None
        }
    }
}
