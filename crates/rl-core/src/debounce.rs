//! Trailing-edge debounce timer.
//!
//! A [`Debouncer`] wraps a zero-argument action and a fixed quiescence
//! window. Each [`call`](Debouncer::call) cancels the pending firing and
//! schedules a new one at *call time + window*, so only the last call of a
//! burst runs the action. Once the timer task wakes up the firing is
//! committed.
//!
//! Timers run on the tokio clock, so tests drive them with
//! `#[tokio::test(start_paused = true)]` instead of sleeping for real.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

type Action = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Default)]
struct TimerState {
    /// When the pending firing is due, if any.
    deadline: Option<Instant>,
    /// Cancels the pending firing.
    pending: Option<JoinHandle<()>>,
    /// Bumped on every reschedule; a woken timer only fires if it is current.
    generation: u64,
    /// How many times the action has run.
    fired: u64,
    /// When the action last ran.
    last_fired: Option<Instant>,
}

/// Debounces an action with a fixed window.
///
/// Safe to call from any thread: the timer is spawned on the runtime
/// captured at construction.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
/// use rl_core::Debouncer;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// let debouncer = Debouncer::new(Duration::from_millis(10), move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// debouncer.call();
/// debouncer.call();
/// tokio::time::sleep(Duration::from_millis(50)).await;
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// # }
/// ```
pub struct Debouncer {
    window: Duration,
    handle: Handle,
    action: Action,
    state: Arc<Mutex<TimerState>>,
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .field("deadline", &state.deadline)
            .field("fired", &state.fired)
            .finish_non_exhaustive()
    }
}

impl Debouncer {
    /// Creates a debouncer on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime; use
    /// [`with_handle`](Self::with_handle) to pass one explicitly.
    pub fn new<F>(window: Duration, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::with_handle(Handle::current(), window, action)
    }

    /// Creates a debouncer whose timers run on `handle`.
    pub fn with_handle<F>(handle: Handle, window: Duration, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            window,
            handle,
            action: Arc::new(action),
            state: Arc::new(Mutex::new(TimerState::default())),
        }
    }

    /// The quiescence window.
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Schedules the action, replacing any pending firing.
    pub fn call(&self) {
        let _runtime = self.handle.enter();
        let deadline = Instant::now() + self.window;
        let mut state = self.state.lock();

        if let Some(previous) = state.pending.take() {
            previous.abort();
            tracing::trace!("debounce rescheduled");
        }
        state.generation += 1;
        let generation = state.generation;

        let action = Arc::clone(&self.action);
        let shared = Arc::clone(&self.state);
        let task = self.handle.spawn(async move {
            time::sleep_until(deadline).await;
            {
                let mut state = shared.lock();
                if state.generation != generation {
                    return;
                }
                state.deadline = None;
                state.pending = None;
                state.fired += 1;
                state.last_fired = Some(Instant::now());
            }
            action();
        });

        state.deadline = Some(deadline);
        state.pending = Some(task);
    }

    /// Drops the pending firing, if any.
    ///
    /// Returns `true` if something was cancelled.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock();
        state.deadline = None;
        state.generation += 1;
        match state.pending.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    /// Returns `true` while a firing is scheduled.
    pub fn is_pending(&self) -> bool {
        self.state.lock().deadline.is_some()
    }

    /// When the pending firing is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.state.lock().deadline
    }

    /// How many times the action has run.
    pub fn fired(&self) -> u64 {
        self.state.lock().fired
    }

    /// When the action last ran.
    pub fn last_fired(&self) -> Option<Instant> {
        self.state.lock().last_fired
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(task) = self.state.lock().pending.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const WINDOW: Duration = Duration::from_millis(150);

    fn counting() -> (Arc<AtomicUsize>, Debouncer) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let debouncer = Debouncer::new(WINDOW, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (hits, debouncer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_call_fires_after_window() {
        let (hits, debouncer) = counting();
        let start = Instant::now();

        debouncer.call();
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.deadline(), Some(start + WINDOW));

        time::sleep(WINDOW - Duration::from_millis(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.last_fired(), Some(start + WINDOW));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_one_firing_after_last_call() {
        let (hits, debouncer) = counting();
        let start = Instant::now();

        for _ in 0..5 {
            debouncer.call();
            time::sleep(Duration::from_millis(20)).await;
        }
        // Last call happened at +80ms, so the firing is due at +230ms.
        let due = start + Duration::from_millis(80) + WINDOW;
        assert_eq!(debouncer.deadline(), Some(due));

        time::sleep_until(due - Duration::from_millis(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(debouncer.fired(), 1);
        assert_eq!(debouncer.last_fired(), Some(due));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (hits, debouncer) = counting();

        debouncer.call();
        time::sleep(WINDOW * 2).await;
        debouncer.call();
        time::sleep(WINDOW * 2).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let (hits, debouncer) = counting();

        debouncer.call();
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        time::sleep(WINDOW * 2).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_from_plain_thread() {
        let (hits, debouncer) = counting();
        let debouncer = Arc::new(debouncer);

        let remote = Arc::clone(&debouncer);
        std::thread::spawn(move || remote.call()).join().unwrap();

        time::sleep(WINDOW * 2).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
