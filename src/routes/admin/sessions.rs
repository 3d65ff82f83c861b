use crate::auth::SessionRegistry;
use crate::helpers::JsonResponse;
use crate::models::AuthenticatedAdmin;
use actix_web::{get, post, web, HttpResponse, Result};
use serde::Serialize;
use std::sync::Arc;

#[tracing::instrument(name = "List admin sessions.", skip_all)]
#[get("/sessions")]
pub async fn list_handler(registry: web::Data<SessionRegistry>) -> Result<HttpResponse> {
    Ok(JsonResponse::build()
        .set_list(registry.list_active())
        .ok("OK"))
}

#[derive(Debug, Serialize)]
pub struct ForceLogoutPayload {
    pub had_active_session: bool,
}

#[tracing::instrument(name = "Force admin logout.", skip_all, fields(operator_id = %operator.id))]
#[post("/sessions/{id}/force-logout")]
pub async fn force_logout_handler(
    operator: web::ReqData<Arc<AuthenticatedAdmin>>,
    path: web::Path<(String,)>,
    registry: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let admin_id = path.into_inner().0;
    let had_active_session = registry.force_logout(&admin_id);

    tracing::info!(
        admin_id = %operator.id,
        admin_email = %operator.email,
        action = "force_logout",
        target = %admin_id,
        had_active_session,
        "Admin action"
    );

    Ok(JsonResponse::build()
        .set_item(ForceLogoutPayload { had_active_session })
        .ok(format!("Admin {admin_id} will be logged out")))
}
