//! `gatekeeper` admin CLI.
//!
//! ```text
//! gatekeeper login --email alice@shop.test
//! gatekeeper whoami
//! gatekeeper sessions
//! gatekeeper force-logout a1
//! gatekeeper watch --interval-secs 60
//! gatekeeper hash-password
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gatekeeper::auth::hash_password;
use gatekeeper::client::{
    AdminApiClient, ClientGuard, CredentialStore, FileCredentialStore, SessionState, Validator,
    DEFAULT_SERVER_URL,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gatekeeper", version, about = "Admin session client")]
struct Cli {
    /// Admin server base URL
    #[arg(long, global = true, env = "GATEKEEPER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and store the session locally
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Read from the prompt when omitted
        #[arg(long, env = "GATEKEEPER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// End the session on the server and forget it locally
    Logout,
    /// Show the admin the stored session belongs to
    Whoami,
    /// List tracked admin sessions
    Sessions,
    /// Force an admin to log out
    ForceLogout {
        /// Admin id
        id: String,
    },
    /// Keep re-validating the session until it ends
    Watch {
        #[arg(long, default_value_t = 300)]
        interval_secs: u64,
    },
    /// Print an argon2 hash for the `admins` section of configuration.yaml
    HashPassword,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = execute(cli).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    let store = FileCredentialStore::with_default_path();
    let server = server_url(&cli.server, &store);
    let guard = Arc::new(ClientGuard::new(store));
    let api = Arc::new(AdminApiClient::new(server, guard.clone()));

    match cli.command {
        Commands::Login { email, password } => {
            let email = match email {
                Some(email) => email,
                None => dialoguer::Input::<String>::new()
                    .with_prompt("Email")
                    .interact_text()?,
            };
            let password = match password {
                Some(password) => password,
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .interact()?,
            };

            let admin = api.login(&email, &password).await?;
            println!("Logged in as {} <{}> on {}", admin.name, admin.email, api.base_url());
        }
        Commands::Logout => {
            api.logout().await?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let admin = api.validate().await?;
            println!("{} <{}> (id: {})", admin.name, admin.email, admin.id);
        }
        Commands::Sessions => {
            let sessions = api.sessions().await?;
            if sessions.is_empty() {
                println!("No tracked sessions");
            }
            for session in sessions {
                println!(
                    "{:<24} last seen {}{}",
                    session.identity,
                    session.last_updated.format("%Y-%m-%d %H:%M:%S UTC"),
                    if session.force_logout { "  [force logout pending]" } else { "" }
                );
            }
        }
        Commands::ForceLogout { id } => {
            let had_session = api.force_logout(&id).await?;
            if had_session {
                println!("Admin {id} will be logged out on the next request");
            } else {
                println!("Admin {id} has no tracked session, the next login will clear the flag");
            }
        }
        Commands::Watch { interval_secs } => {
            let admin = api.validate().await.context("Cannot start watching")?;
            println!("Watching session of {} every {interval_secs}s", admin.email);

            let mut state = guard.subscribe();
            let validator = Validator::spawn(api.clone(), Duration::from_secs(interval_secs));

            tokio::select! {
                _ = state.wait_for(|state| *state != SessionState::SignedIn) => {}
                _ = tokio::signal::ctrl_c() => {
                    validator.stop();
                    println!("Stopped");
                    return Ok(());
                }
            }

            match guard.state() {
                SessionState::SignedOut(Some(reason)) => {
                    println!("Session ended: {reason}. Run: gatekeeper login")
                }
                _ => println!("Session ended. Run: gatekeeper login"),
            }
        }
        Commands::HashPassword => {
            let password = dialoguer::Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?;
            let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("{hash}");
        }
    }

    Ok(())
}

/// The stored session remembers where it was issued, prefer that over the default.
fn server_url(cli_server: &str, store: &FileCredentialStore) -> String {
    if cli_server != DEFAULT_SERVER_URL {
        return cli_server.to_string();
    }
    match store.load() {
        Ok(Some(session)) => session.server_url,
        _ => cli_server.to_string(),
    }
}
