//! Store owning the session state and executing reducer effects.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::RwLock;
use tripmarket_core::{Effect, Reducer, SmallVec};

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::providers::{AuthProvider, ModeRepository};
use crate::reducer::SessionReducer;
use crate::state::SessionState;

/// Owns one session's [`SessionState`], runs the reducer, and executes the
/// effects it returns, feeding produced actions back in until the chain
/// settles.
pub struct SessionStore<A, M>
where
    A: AuthProvider + Clone + Send + Sync + 'static,
    M: ModeRepository + Clone + Send + Sync + 'static,
{
    state: Arc<RwLock<SessionState>>,
    reducer: SessionReducer<A, M>,
    environment: SessionEnvironment<A, M>,
}

impl<A, M> SessionStore<A, M>
where
    A: AuthProvider + Clone + Send + Sync + 'static,
    M: ModeRepository + Clone + Send + Sync + 'static,
{
    /// Create a store over a fresh anonymous session.
    #[must_use]
    pub fn new(environment: SessionEnvironment<A, M>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::new())),
            reducer: SessionReducer::new(),
            environment,
        }
    }

    /// Dispatch an action and run every effect it spawns to completion.
    ///
    /// The write lock is held only while the reducer runs, never across an
    /// effect await. `Parallel` effects are executed one after the other in
    /// declaration order; nothing in this crate relies on true parallelism
    /// between effects of one action.
    pub async fn send(&self, action: SessionAction) {
        let mut queue: VecDeque<Effect<SessionAction>> =
            self.dispatch(action).await.into_iter().collect();

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::None => {}
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    for (offset, nested) in effects.into_iter().enumerate() {
                        queue.insert(offset, nested);
                    }
                }
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    queue.extend(self.dispatch(*action).await);
                }
                Effect::Future(future) => {
                    if let Some(action) = future.await {
                        queue.extend(self.dispatch(action).await);
                    }
                }
            }
        }
    }

    async fn dispatch(&self, action: SessionAction) -> SmallVec<[Effect<SessionAction>; 4]> {
        let mut state = self.state.write().await;
        self.reducer.reduce(&mut state, action, &self.environment)
    }

    /// Snapshot of the current session state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Take the pending navigation target, clearing it.
    pub async fn take_navigation(&self) -> Option<String> {
        self.state.write().await.take_navigation()
    }
}
