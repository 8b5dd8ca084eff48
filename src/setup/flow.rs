//! SetupFlow — coordinates form input, step transitions, and persistence.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::equipment::presets::{BasketPreset, GrinderPreset};
use crate::error::{DatabaseError, SetupError};
use crate::store::{BasketConfigStore, GrinderConfigStore, SetupStatusStore};

use super::form::{BasketField, GrinderField};
use super::state::FlowState;
use super::step::SetupStep;

/// Setup status as reported to clients.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SetupStatus {
    pub completed: bool,
    pub step: SetupStep,
}

/// Owns the flow state for one setup session and drives it through input,
/// navigation, and the two persistence operations.
///
/// State changes are published on a watch channel, so observers subscribe to
/// snapshots instead of reading ambient mutable fields. All mutation goes
/// through this single owner.
pub struct SetupFlow {
    grinder_store: Arc<dyn GrinderConfigStore>,
    basket_store: Arc<dyn BasketConfigStore>,
    status_store: Arc<dyn SetupStatusStore>,
    state: RwLock<FlowState>,
    state_tx: watch::Sender<FlowState>,
}

impl SetupFlow {
    pub fn new(
        grinder_store: Arc<dyn GrinderConfigStore>,
        basket_store: Arc<dyn BasketConfigStore>,
        status_store: Arc<dyn SetupStatusStore>,
    ) -> Self {
        let state = FlowState::new();
        let (state_tx, _) = watch::channel(state.clone());
        Self {
            grinder_store,
            basket_store,
            status_store,
            state: RwLock::new(state),
            state_tx,
        }
    }

    /// Current state snapshot.
    pub async fn state(&self) -> FlowState {
        self.state.read().await.clone()
    }

    /// Subscribe to state snapshots. The receiver holds the latest snapshot
    /// and is notified on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.state_tx.subscribe()
    }

    fn publish(&self, state: &FlowState) {
        // Nobody listening is fine
        let _ = self.state_tx.send(state.clone());
    }

    // ── Input ───────────────────────────────────────────────────────

    pub async fn set_grinder_field(&self, field: GrinderField, raw: &str) {
        let mut state = self.state.write().await;
        state.grinder.set(field, raw);
        self.publish(&state);
    }

    pub async fn set_basket_field(&self, field: BasketField, raw: &str) {
        let mut state = self.state.write().await;
        state.basket.set(field, raw);
        self.publish(&state);
    }

    pub async fn apply_grinder_preset(&self, preset: GrinderPreset) {
        let mut state = self.state.write().await;
        state.grinder.apply_preset(preset);
        self.publish(&state);
    }

    pub async fn apply_basket_preset(&self, preset: BasketPreset) {
        let mut state = self.state.write().await;
        state.basket.apply_preset(preset);
        self.publish(&state);
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Attempt a forward transition. Blocked transitions are silent no-ops;
    /// the returned step tells the caller where the flow ended up.
    pub async fn advance(&self) -> SetupStep {
        let mut state = self.state.write().await;
        if state.advance() {
            self.publish(&state);
        }
        state.step
    }

    /// Go back one step, unconditionally.
    pub async fn retreat(&self) -> SetupStep {
        let mut state = self.state.write().await;
        if state.retreat() {
            self.publish(&state);
        }
        state.step
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Save the configured grinder and basket, then mark setup complete.
    ///
    /// Writes are sequential with no rollback: a grinder failure aborts
    /// before the basket is touched; a basket failure leaves the grinder
    /// saved. Re-entry is safe because both saves are upserts and the
    /// completion flag is idempotent.
    pub async fn finalize(&self) -> Result<(), SetupError> {
        let (grinder, mut basket) = {
            let mut state = self.state.write().await;
            if state.is_loading {
                debug!("Finalize ignored, save already in flight");
                return Ok(());
            }

            let parsed = if state.grinder.is_valid && state.basket.is_valid {
                state.grinder.parsed().zip(state.basket.parsed())
            } else {
                None
            };
            let Some(configs) = parsed else {
                let err =
                    SetupError::Validation("Please complete all fields before finishing".into());
                state.error = Some(err.user_message());
                self.publish(&state);
                return Err(err);
            };

            state.is_loading = true;
            state.error = None;
            self.publish(&state);
            configs
        };

        if let Err(e) = self.grinder_store.save(&grinder).await {
            warn!(error = %e, "Failed to save grinder configuration");
            return self.fail("Grinder settings could not be saved", e).await;
        }
        info!(
            scale_min = grinder.scale_min,
            scale_max = grinder.scale_max,
            "Grinder configuration saved"
        );

        basket.is_active = true;
        if let Err(e) = self.basket_store.save(&basket).await {
            warn!(error = %e, "Failed to save basket configuration");
            return self.fail("Basket settings could not be saved", e).await;
        }
        info!(basket_id = %basket.id, "Basket configuration saved");

        self.complete().await;
        Ok(())
    }

    /// Skip setup: persist the default grinder configuration and the
    /// double-shot basket preset, then mark setup complete. Same sequential,
    /// no-rollback ordering as `finalize`.
    pub async fn skip(&self) -> Result<(), SetupError> {
        {
            let mut state = self.state.write().await;
            if state.is_loading {
                debug!("Skip ignored, save already in flight");
                return Ok(());
            }
            state.is_loading = true;
            state.error = None;
            self.publish(&state);
        }

        let grinder = match self.grinder_store.get_or_create_default().await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Failed to prepare default grinder configuration");
                return self
                    .fail("Default grinder settings could not be prepared", e)
                    .await;
            }
        };
        info!(
            scale_min = grinder.scale_min,
            scale_max = grinder.scale_max,
            "Using default grinder configuration"
        );

        let mut basket = BasketPreset::Double.config();
        basket.is_active = true;
        if let Err(e) = self.basket_store.save(&basket).await {
            warn!(error = %e, "Failed to save default basket configuration");
            return self.fail("Default basket settings could not be saved", e).await;
        }

        self.complete().await;
        Ok(())
    }

    /// Setup status for clients: the persisted completion flag plus the
    /// session's current step.
    pub async fn status(&self) -> Result<SetupStatus, SetupError> {
        let completed = self
            .status_store
            .is_complete()
            .await
            .map_err(SetupError::from_store)?;
        let state = self.state.read().await;
        Ok(SetupStatus {
            completed,
            step: state.step,
        })
    }

    /// Mark setup complete and clear the loading flag. The flag write's
    /// result is not consumed: it is idempotent and re-entry covers a miss.
    async fn complete(&self) {
        if let Err(e) = self.status_store.mark_complete().await {
            warn!(error = %e, "Failed to mark setup complete");
        }

        let mut state = self.state.write().await;
        state.is_loading = false;
        state.error = None;
        self.publish(&state);
        info!("First-run setup finished");
    }

    /// Record a persistence failure: loading cleared, displayable error set,
    /// flow stays on the current step. No automatic retry.
    async fn fail(&self, context: &str, err: DatabaseError) -> Result<(), SetupError> {
        let err = SetupError::from_store(err);
        let mut state = self.state.write().await;
        state.is_loading = false;
        state.error = Some(format!("{context}: {}", err.user_message()));
        self.publish(&state);
        Err(err)
    }
}
