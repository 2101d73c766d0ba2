//! Single-flight gate around provider resource loading.
//!
//! At most one load attempt is in flight per session. Concurrent callers
//! share that attempt and its outcome; a successful load is remembered for
//! the rest of the session and a failed one clears the slot so the next call
//! starts a fresh attempt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tracing::{info, warn};

use crate::domain::api_key::ApiKey;
use crate::domain::ports::{CallbackName, LoadError, SdkLoader};

type SharedLoad = Shared<BoxFuture<'static, Result<(), LoadError>>>;

enum GateState {
    Idle,
    Loading { attempt: u64, load: SharedLoad },
    Loaded,
}

pub(super) struct SdkGate {
    loader: Arc<dyn SdkLoader>,
    timeout: Duration,
    state: Mutex<GateState>,
    attempts: AtomicU64,
}

impl SdkGate {
    pub(super) fn new(loader: Arc<dyn SdkLoader>, timeout: Duration) -> Self {
        Self {
            loader,
            timeout,
            state: Mutex::new(GateState::Idle),
            attempts: AtomicU64::new(0),
        }
    }

    pub(super) fn is_loaded(&self) -> bool {
        matches!(*self.lock_state(), GateState::Loaded)
    }

    pub(super) async fn load(&self, key: Option<&ApiKey>) -> Result<(), LoadError> {
        let Some(key) = key else {
            return Err(LoadError::missing_credential());
        };

        let (attempt, load) = {
            let mut state = self.lock_state();
            match &*state {
                GateState::Loaded => return Ok(()),
                GateState::Loading { attempt, load } => (*attempt, load.clone()),
                GateState::Idle => {
                    let attempt = self.next_attempt();
                    let load =
                        Self::attempt(Arc::clone(&self.loader), key.clone(), self.timeout, attempt)
                            .boxed()
                            .shared();
                    *state = GateState::Loading {
                        attempt,
                        load: load.clone(),
                    };
                    (attempt, load)
                }
            }
        };

        let outcome = load.await;

        let mut state = self.lock_state();
        if matches!(&*state, GateState::Loading { attempt: current, .. } if *current == attempt) {
            *state = if outcome.is_ok() {
                GateState::Loaded
            } else {
                GateState::Idle
            };
        }
        outcome
    }

    async fn attempt(
        loader: Arc<dyn SdkLoader>,
        key: ApiKey,
        timeout: Duration,
        attempt: u64,
    ) -> Result<(), LoadError> {
        let callback = CallbackName::generate();
        info!(attempt, callback = %callback, "loading provider resources");

        let outcome = match tokio::time::timeout(timeout, loader.load(&key, &callback)).await {
            Ok(result) => result,
            Err(_) => Err(LoadError::network_or_timeout(format!(
                "no completion signal within {}s",
                timeout.as_secs()
            ))),
        };
        match &outcome {
            Ok(()) => info!(attempt, "provider resources loaded"),
            Err(error) => warn!(attempt, code = error.code(), %error, "provider resource load failed"),
        }
        outcome
    }

    fn next_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn lock_state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
