use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::action::Action;
use super::effects::{DataEffects, Effect};
use super::reducer::reduce;
use super::state::AppState;

/// Application runtime - owns the state and drives the action loop
///
/// The Runtime is responsible for:
/// - Managing the application state
/// - Dispatching actions through the reducer
/// - Turning data effects into provider calls
/// - Executing side effects asynchronously
pub struct Runtime {
    /// Current application state
    state: AppState,

    /// Channel for dispatching actions
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,

    /// Channel for queuing effects
    effect_tx: mpsc::UnboundedSender<Effect>,

    /// Data effects handler
    data_effects: Arc<DataEffects>,
}

impl Runtime {
    /// Create a new runtime with initial state and data effects handler
    pub fn new(initial_state: AppState, data_effects: Arc<DataEffects>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (effect_tx, mut effect_rx) = mpsc::unbounded_channel();

        // Spawn effect executor task
        let action_tx_clone = action_tx.clone();
        tokio::spawn(async move {
            Self::run_effect_executor(&mut effect_rx, action_tx_clone).await;
        });

        Self {
            state: initial_state,
            action_tx,
            action_rx,
            effect_tx,
            data_effects,
        }
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Dispatch an action to be processed by the reducer
    ///
    /// Uses mem::take to avoid cloning AppState.
    pub fn dispatch(&mut self, action: Action) {
        trace!("ACTION: Dispatching {:?}", action);

        let state = std::mem::take(&mut self.state);
        let (new_state, effect) = reduce(state, action);
        self.state = new_state;

        self.execute_effect(effect);
    }

    /// Execute an effect, resolving data variants into provider calls
    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::None => {
                // Nothing to do
            }
            Effect::Batch(effects) => {
                for e in effects {
                    self.execute_effect(e);
                }
            }
            Effect::Action(_) | Effect::Async(_) => {
                trace!("ACTION: Queueing effect for async execution");
                let _ = self.effect_tx.send(effect);
            }
            data => {
                debug!("EFFECT: Executing {:?}", data);
                let resolved = self.data_effects.resolve(data);
                let _ = self.effect_tx.send(resolved);
            }
        }
    }

    /// Process all pending actions in the queue
    ///
    /// Returns the number of actions processed
    pub fn process_actions(&mut self) -> usize {
        let mut count = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
            count += 1;
        }
        count
    }

    /// Get a sender for dispatching actions from external sources
    pub fn action_sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Execute effects asynchronously
    ///
    /// This runs in a separate tokio task and processes effects as they come in.
    /// Effects can dispatch new actions which feed back into the runtime.
    async fn run_effect_executor(
        effect_rx: &mut mpsc::UnboundedReceiver<Effect>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) {
        while let Some(effect) = effect_rx.recv().await {
            Self::process_effect_async(effect, &action_tx);
        }
    }

    /// Process a single effect in the async executor
    fn process_effect_async(effect: Effect, action_tx: &mpsc::UnboundedSender<Action>) {
        match effect {
            Effect::None => {}
            Effect::Action(action) => {
                let _ = action_tx.send(action);
            }
            Effect::Batch(effects) => {
                for e in effects {
                    Self::process_effect_async(e, action_tx);
                }
            }
            Effect::Async(future) => {
                let action_tx = action_tx.clone();
                tokio::spawn(async move {
                    let action = future.await;
                    let _ = action_tx.send(action);
                });
            }
            // Data effects are resolved by execute_effect() before being queued
            other => {
                warn!("EFFECT: {:?} reached the async executor unresolved", other);
            }
        }
    }
}
