//! Cooperative sleeps for the single-threaded runtime.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Yield to the runtime for `ms` milliseconds.
///
/// Web builds use a browser timer; desktop builds run on the Dioxus tokio
/// runtime.
pub async fn sleep_ms(ms: u64) {
    if ms == 0 {
        return;
    }

    #[cfg(target_arch = "wasm32")]
    {
        gloo_timers::future::sleep(Duration::from_millis(ms)).await;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

pub async fn sleep(duration: Duration) {
    sleep_ms(duration.as_millis() as u64).await;
}

/// Trailing-edge debounce: of several overlapping [`Debounce::settle`]
/// calls only the last one reports `true`.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct Debounce {
    generation: Rc<Cell<u64>>,
}

impl Debounce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits `delay`, then tells whether no newer call arrived meanwhile.
    pub async fn settle(&self, delay: Duration) -> bool {
        let ticket = self.generation.get().wrapping_add(1);
        self.generation.set(ticket);
        sleep(delay).await;
        self.generation.get() == ticket
    }
}
