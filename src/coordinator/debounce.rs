use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Coalesces bursts of refresh requests.
///
/// The first request in an idle period fires immediately. Every further
/// request inside the cooldown window is folded into a single trailing
/// fire, rescheduled to one full cooldown after the latest request, so a
/// burst of any size fires exactly twice.
pub(crate) struct Debouncer {
    inner: Arc<Inner>,
}

struct Inner {
    cooldown: Duration,
    fire: Box<dyn Fn() + Send + Sync>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    /// Bumped on every reschedule; a trailing task that already woke up
    /// must not fire for a superseded request.
    generation: u64,
    last_fired: Option<Instant>,
    trailing: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub(crate) fn new(cooldown: Duration, fire: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                cooldown,
                fire: Box::new(fire),
                state: Mutex::new(State::default()),
            }),
        }
    }

    pub(crate) fn request(&self) {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let idle = state.trailing.is_none()
            && state
                .last_fired
                .is_none_or(|fired| fired.elapsed() >= self.inner.cooldown);

        if idle {
            state.last_fired = Some(Instant::now());
            drop(state);
            (self.inner.fire)();
            return;
        }

        state.generation += 1;
        let generation = state.generation;
        if let Some(trailing) = state.trailing.take() {
            trailing.abort();
        }
        let inner = Arc::clone(&self.inner);
        state.trailing = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.cooldown).await;
            inner.fire_trailing(generation);
        }));
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(trailing) = state.trailing.as_ref() {
            trailing.abort();
        }
    }
}

impl Inner {
    fn fire_trailing(&self, generation: u64) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation != generation {
                return;
            }
            state.trailing = None;
            state.last_fired = Some(Instant::now());
        }
        (self.fire)();
    }
}
