use crate::auth::SessionRegistry;
use crate::helpers::{CookiePolicy, JsonResponse};
use crate::models::AuthenticatedAdmin;
use actix_web::{post, web, HttpResponse, Result};
use std::sync::Arc;

#[tracing::instrument(name = "Admin logout.", skip_all, fields(admin_id = %admin.id))]
#[post("/logout")]
pub async fn logout_handler(
    admin: web::ReqData<Arc<AuthenticatedAdmin>>,
    registry: web::Data<SessionRegistry>,
    cookies: web::Data<CookiePolicy>,
) -> Result<HttpResponse> {
    registry.remove(&admin.id);

    let mut response = JsonResponse::<()>::build().ok("Logged out successfully");
    response.add_cookie(&cookies.removal()).map_err(|err| {
        tracing::error!("failed to expire session cookie: {err}");
        JsonResponse::<()>::build().internal_server_error("Failed to clear session cookie")
    })?;

    tracing::info!(
        admin_id = %admin.id,
        admin_email = %admin.email,
        action = "logout",
        "Admin action"
    );
    Ok(response)
}
