use gatekeeper::auth::SessionRegistry;
use gatekeeper::configuration::get_configuration;
use gatekeeper::startup::run;
use gatekeeper::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = get_configuration().expect("Failed to read configuration.");

    let subscriber = get_subscriber("gatekeeper".into(), settings.default_log_filter());
    init_subscriber(subscriber);

    tracing::info!(
        environment = settings.environment.as_str(),
        admins = settings.admins.len(),
        token_ttl_days = settings.auth.token_ttl_days,
        "Configuration loaded"
    );

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener = TcpListener::bind(&address)?;

    // sessions live for the lifetime of the process
    let registry = Arc::new(SessionRegistry::new());

    run(listener, settings, registry)?.await
}
