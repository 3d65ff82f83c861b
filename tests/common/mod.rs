#![allow(dead_code)]

use gatekeeper::auth::{hash_password, AdminAccount, SessionRegistry, TokenCodec};
use gatekeeper::configuration::{AuthSettings, Environment, Settings};
use std::net::TcpListener;
use std::sync::{Arc, OnceLock};

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct horse battery staple";

pub const ALICE_ID: &str = "a1";
pub const ALICE_EMAIL: &str = "alice@shop.test";
pub const BOB_ID: &str = "b2";
pub const BOB_EMAIL: &str = "bob@shop.test";
pub const CAROL_ID: &str = "c3";
pub const CAROL_EMAIL: &str = "carol@shop.test";

pub struct TestApp {
    pub address: String,
    pub registry: Arc<SessionRegistry>,
    pub codec: TokenCodec,
}

// argon2 is slow in debug builds, hash once per test binary
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).expect("Failed to hash password"))
        .clone()
}

fn account(id: &str, name: &str, email: &str, is_admin: bool) -> AdminAccount {
    AdminAccount {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash(),
        is_admin,
    }
}

pub fn test_settings() -> Settings {
    Settings {
        app_port: 0,
        app_host: "127.0.0.1".to_string(),
        environment: Environment::Development,
        log_level: None,
        auth: AuthSettings {
            jwt_secret: SECRET.to_string(),
            token_ttl_days: 30,
            cookie_name: "adminToken".to_string(),
        },
        admins: vec![
            account(ALICE_ID, "Alice", ALICE_EMAIL, true),
            account(BOB_ID, "Bob", BOB_EMAIL, true),
            // listed, but without admin rights
            account(CAROL_ID, "Carol", CAROL_EMAIL, false),
        ],
    }
}

pub async fn spawn_app_with_settings(settings: Settings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let codec = TokenCodec::new(
        settings.auth.jwt_secret.as_bytes(),
        chrono::Duration::days(settings.auth.token_ttl_days),
    );
    let registry = Arc::new(SessionRegistry::new());

    let server = gatekeeper::startup::run(listener, settings, registry.clone())
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        registry,
        codec,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_settings(test_settings()).await
}

impl TestApp {
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/admin/login", self.address))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Log in with the shared password and return the issued token.
    pub async fn login_token(&self, email: &str) -> String {
        let response = self.login(email, PASSWORD).await;
        assert_eq!(200, response.status().as_u16());
        let body: serde_json::Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn get_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn error_code(response: reqwest::Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    body["code"].as_str().map(str::to_string)
}
