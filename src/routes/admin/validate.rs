use crate::auth::AdminDirectory;
use crate::helpers::JsonResponse;
use crate::models::{AdminProfile, AuthenticatedAdmin};
use actix_web::{get, web, HttpResponse, Result};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct AdminPayload {
    pub admin: AdminProfile,
}

#[tracing::instrument(name = "Validate admin token.", skip_all, fields(admin_id = %admin.id))]
#[get("/validate-token")]
pub async fn validate_token_handler(
    admin: web::ReqData<Arc<AuthenticatedAdmin>>,
    directory: web::Data<Arc<dyn AdminDirectory>>,
) -> Result<HttpResponse> {
    let profile = directory
        .find_by_id(&admin.id)
        .map(|account| account.profile())
        .unwrap_or_else(|| AdminProfile {
            id: admin.id.clone(),
            name: admin.email.clone(),
            email: admin.email.clone(),
        });

    Ok(JsonResponse::build()
        .set_item(AdminPayload { admin: profile })
        .ok("Token is valid"))
}
