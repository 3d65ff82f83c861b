use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::client::{AdminApiClient, ClientError, CredentialStore, SessionState};

/// Periodic re-validation of the held credential.
pub struct Validator;

impl Validator {
    /// Start validating every `period`. The first check runs one period after
    /// the spawn. The task ends by itself once the guard leaves the signed-in
    /// state, whoever caused it.
    pub fn spawn<S>(api: Arc<AdminApiClient<S>>, period: Duration) -> ValidatorHandle
    where
        S: CredentialStore + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            let mut state = api.guard().subscribe();
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                if *state.borrow_and_update() != SessionState::SignedIn {
                    break;
                }

                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = state.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        continue;
                    }
                }

                match api.validate().await {
                    Ok(admin) => tracing::debug!(admin_id = %admin.id, "Admin token still valid"),
                    Err(ClientError::LoggedOut(reason)) => {
                        tracing::info!(reason = reason.code(), "Admin session ended");
                        break;
                    }
                    Err(err) if err.is_unauthorized() => {
                        tracing::info!("Token validation rejected: {err}");
                        api.guard().clear(None);
                        break;
                    }
                    Err(err) => tracing::warn!("Token validation failed, will retry: {err}"),
                }
            }
            tracing::debug!("Token validator stopped");
        });

        ValidatorHandle { task }
    }
}

/// Owning handle, dropping it stops the validator.
pub struct ValidatorHandle {
    task: JoinHandle<()>,
}

impl ValidatorHandle {
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ValidatorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
