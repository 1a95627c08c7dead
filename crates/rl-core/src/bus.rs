//! In-process publish/subscribe hub for lifecycle and output events.
//!
//! The bus carries a closed set of [`BusEvent`]s between the process
//! supervisor, the change-source adapter, and the viewer. Every listener owns
//! an unbounded FIFO queue, so a single producer's events are observed in the
//! order they were sent, and consumers drain their queue on their own task.
//!
//! # Event Flow
//!
//! ```text
//! Supervisor reader ──Output──┐
//! Supervisor run task ─Started/Error/Killed/Stopped─┤
//! Change adapter ──RequestRestart──────────────────┤
//!                                                   ▼
//!                                   EventBus::send (registration order)
//!                                      │                 │
//!                                      ▼                 ▼
//!                               viewer queue      supervisor queue
//! ```

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Events carried by the [`EventBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BusEvent {
    /// A run is starting; carries the command line.
    Started(String),
    /// A chunk of output read from the pseudo-terminal.
    Output(String),
    /// A run failed to start or a background step failed.
    Error(String),
    /// The running child was sent SIGTERM.
    Killed,
    /// The output stream ended.
    Stopped,
    /// Someone wants the command restarted.
    RequestRestart,
}

impl BusEvent {
    /// Short label used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Started(_) => "started",
            Self::Output(_) => "output",
            Self::Error(_) => "error",
            Self::Killed => "killed",
            Self::Stopped => "stopped",
            Self::RequestRestart => "request_restart",
        }
    }
}

/// Receiving half handed to each listener.
pub type BusReceiver = mpsc::UnboundedReceiver<BusEvent>;

/// Broadcast hub with message-passing delivery.
///
/// Typically shared as `Arc<EventBus>`.
///
/// # Examples
///
/// ```
/// use rl_core::{BusEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.send_output("hello\n");
/// bus.send_stopped();
///
/// assert_eq!(rx.try_recv().ok(), Some(BusEvent::Output("hello\n".into())));
/// assert_eq!(rx.try_recv().ok(), Some(BusEvent::Stopped));
/// ```
#[derive(Debug, Default)]
pub struct EventBus {
    listeners: Mutex<Vec<mpsc::UnboundedSender<BusEvent>>>,
}

impl EventBus {
    /// Creates a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its queue.
    ///
    /// Listeners receive events in registration order; dropping the
    /// receiver unsubscribes on the next send.
    pub fn subscribe(&self) -> BusReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.lock().push(tx);
        rx
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().iter().filter(|tx| !tx.is_closed()).count()
    }

    /// Broadcasts an event to every listener.
    ///
    /// Sending holds the listener lock, so concurrent producers are
    /// serialized and each listener sees one total order.
    pub fn send(&self, event: BusEvent) {
        let mut listeners = self.listeners.lock();
        listeners.retain(|tx| tx.send(event.clone()).is_ok());
        tracing::trace!(kind = event.kind(), listeners = listeners.len(), "bus event");
    }

    /// Sends [`BusEvent::Started`].
    pub fn send_started(&self, command: impl Into<String>) {
        self.send(BusEvent::Started(command.into()));
    }

    /// Sends [`BusEvent::Output`].
    pub fn send_output(&self, chunk: impl Into<String>) {
        self.send(BusEvent::Output(chunk.into()));
    }

    /// Sends [`BusEvent::Error`].
    pub fn send_error(&self, message: impl Into<String>) {
        self.send(BusEvent::Error(message.into()));
    }

    /// Sends [`BusEvent::Killed`].
    pub fn send_killed(&self) {
        self.send(BusEvent::Killed);
    }

    /// Sends [`BusEvent::Stopped`].
    pub fn send_stopped(&self) {
        self.send(BusEvent::Stopped);
    }

    /// Sends [`BusEvent::RequestRestart`].
    pub fn request_restart(&self) {
        self.send(BusEvent::RequestRestart);
    }
}
