use crate::auth::{AdminDirectory, InMemoryAdminDirectory, SessionRegistry, TokenCodec};
use crate::configuration::Settings;
use crate::helpers::JsonResponse;
use crate::middleware;
use crate::routes;
use actix_web::{dev::Server, error, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

/// Build and start the HTTP server. The registry is passed in so the caller
/// (or a test) owns it.
pub fn run(
    listener: TcpListener,
    settings: Settings,
    registry: Arc<SessionRegistry>,
) -> Result<Server, std::io::Error> {
    let ttl = chrono::Duration::try_days(settings.auth.token_ttl_days).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "auth.token_ttl_days is out of range",
        )
    })?;
    let codec = Arc::new(TokenCodec::new(settings.auth.jwt_secret.as_bytes(), ttl));
    let cookies = settings.cookie_policy();

    let directory = InMemoryAdminDirectory::new(settings.admins.clone());
    if directory.is_empty() {
        tracing::warn!("No admin accounts configured, every login will fail");
    }
    let directory: Arc<dyn AdminDirectory> = Arc::new(directory);
    let directory = web::Data::new(directory);

    let gate = middleware::authentication::Gate::new(codec.clone(), registry.clone(), cookies.clone());

    let codec = web::Data::from(codec);
    let registry = web::Data::from(registry);
    let cookies = web::Data::new(cookies);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg = match &err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "Invalid request body at line {}, column {}: {}",
                err.line(),
                err.column(),
                err
            ),
            other => format!("Invalid request body: {}", other),
        };
        JsonResponse::<()>::build().bad_request(msg)
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/admin")
                    .service(routes::admin::login_handler)
                    .service(
                        web::scope("")
                            .wrap(gate.clone())
                            .service(routes::admin::logout_handler)
                            .service(routes::admin::validate_token_handler)
                            .service(routes::admin::list_handler)
                            .service(routes::admin::force_logout_handler),
                    ),
            )
            .app_data(json_config.clone())
            .app_data(codec.clone())
            .app_data(registry.clone())
            .app_data(directory.clone())
            .app_data(cookies.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
