use crate::auth::{AdminDirectory, SessionRegistry, TokenCodec};
use crate::forms;
use crate::helpers::{CookiePolicy, JsonResponse};
use crate::models::AdminProfile;
use actix_web::{post, web, HttpResponse, Result};
use serde::Serialize;
use serde_valid::Validate;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct LoginPayload {
    pub admin: AdminProfile,
    pub token: String,
}

#[tracing::instrument(
    name = "Admin login.",
    skip(form, directory, codec, registry, cookies),
    fields(admin_email = %form.email)
)]
#[post("/login")]
pub async fn login_handler(
    form: web::Json<forms::LoginForm>,
    directory: web::Data<Arc<dyn AdminDirectory>>,
    codec: web::Data<TokenCodec>,
    registry: web::Data<SessionRegistry>,
    cookies: web::Data<CookiePolicy>,
) -> Result<HttpResponse> {
    if let Err(errors) = form.validate() {
        return Err(JsonResponse::<LoginPayload>::build().form_error(errors.to_string()));
    }

    let forms::LoginForm { email, password } = form.into_inner();
    let directory = directory.into_inner();
    let account = web::block(move || directory.verify_credentials(&email, &password))
        .await
        .map_err(|err| {
            tracing::error!("password verification did not complete: {err}");
            JsonResponse::<LoginPayload>::build().internal_server_error("Failed to verify credentials")
        })?
        .ok_or_else(|| {
            tracing::warn!("Admin login failed: invalid credentials");
            JsonResponse::<LoginPayload>::build().unauthorized("Invalid credentials")
        })?;

    if !account.is_admin {
        tracing::warn!(admin_id = %account.id, "Admin login refused: account is not an admin");
        return Err(JsonResponse::<LoginPayload>::build().unauthorized("Not authorized as admin"));
    }

    // a pending forced logout does not block the login, the login acknowledges it
    let opened = registry.open_session(&account.id);
    if opened.acknowledged_force_logout {
        tracing::info!(admin_id = %account.id, "Pending force logout acknowledged by login");
    }

    let token = codec
        .issue(&account.id, &account.email, account.is_admin, opened.generation)
        .map_err(|err| {
            tracing::error!("{err}");
            JsonResponse::<LoginPayload>::build().internal_server_error("Failed to issue credential")
        })?;

    let mut response = JsonResponse::build()
        .set_item(LoginPayload {
            admin: account.profile(),
            token: token.clone(),
        })
        .ok("Login successful");
    response.add_cookie(&cookies.session(&token)).map_err(|err| {
        tracing::error!("failed to set session cookie: {err}");
        JsonResponse::<LoginPayload>::build().internal_server_error("Failed to set session cookie")
    })?;

    tracing::info!(
        admin_id = %account.id,
        admin_email = %account.email,
        action = "login",
        "Admin action"
    );
    Ok(response)
}
