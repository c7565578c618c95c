//! Execute reducer effects to completion in tests.
//!
//! [`ReducerTest`](crate::ReducerTest) inspects the effects an action
//! returns without running them. Flow tests want the opposite: feed an
//! action in, run every produced effect, and look at the state the whole
//! chain settles into. `drive` does that, with delays firing immediately
//! so time-based retries do not slow tests down.

use std::collections::VecDeque;

use tripmarket_core::effect::Effect;
use tripmarket_core::reducer::Reducer;

/// Dispatch `action` and execute all returned effects, feeding produced
/// actions back into the reducer until the queue drains.
///
/// `Delay` effects fire immediately; `Parallel` effects run one after the
/// other in declaration order, which is deterministic and sufficient for
/// assertions on the settled state.
pub async fn drive<R>(
    reducer: &R,
    state: &mut R::State,
    env: &R::Environment,
    action: R::Action,
) where
    R: Reducer,
{
    let mut queue: VecDeque<Effect<R::Action>> =
        reducer.reduce(state, action, env).into_iter().collect();

    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::None => {}
            Effect::Parallel(effects) | Effect::Sequential(effects) => {
                for (offset, nested) in effects.into_iter().enumerate() {
                    queue.insert(offset, nested);
                }
            }
            Effect::Delay { action, .. } => {
                queue.extend(reducer.reduce(state, *action, env));
            }
            Effect::Future(future) => {
                if let Some(action) = future.await {
                    queue.extend(reducer.reduce(state, action, env));
                }
            }
        }
    }
}
