//! The process supervisor.
//!
//! # Run Cycle
//!
//! ```text
//! run()  ── startup delay ──► restart_now()
//! restart() ── Debouncer (150ms) ──► restart_now()
//!
//! restart_now():  stop() ─► await previous run task ─► spawn run task
//!
//! run task (start()):
//!   new run id, Started ─► spawn in pty ─┬─ failure ─► Error, return
//!                                        └─ ok ─► reader thread (Output…, Stopped)
//!                                                 dropped once a newer run starts
//!                                                 await control signal
//!                                                 SIGTERM to group ─► Killed
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use portable_pty::{MasterPty, PtySize};
use rl_core::{BusEvent, Command, Debouncer, EventBus, RunnerConfig};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::RunError;
use crate::pty::{self, DEFAULT_SIZE, Spawned};
use crate::state::ProcessState;

/// How long a stopped run waits for the output stream to close before
/// handing over to the next run.
const STREAM_DRAIN_GRACE: Duration = Duration::from_secs(2);

struct Inner {
    command: Command,
    bus: Arc<EventBus>,
    startup_delay: Duration,
    state: Mutex<ProcessState>,
    /// Unblocks the pending `start()`, if any.
    control: Mutex<Option<oneshot::Sender<()>>>,
    /// The current run task; the async lock serializes restarts.
    run_task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
    master: Mutex<Option<Box<dyn MasterPty + Send>>>,
    size: Mutex<PtySize>,
    debouncer: Debouncer,
    /// Set by `shutdown()`; no new runs start afterwards.
    closed: AtomicBool,
    /// Id of the newest run. Output from older runs is dropped.
    run_id: Mutex<u64>,
}

/// Runs one command at a time in a pseudo-terminal.
///
/// Cheap to clone; clones share the same child.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use rl_core::{Command, EventBus, RunnerConfig};
/// use rl_runner::Supervisor;
///
/// # async fn example() {
/// let bus = Arc::new(EventBus::new());
/// let mut events = bus.subscribe();
/// let command = Command::new(["cargo", "run"]).unwrap();
///
/// let supervisor = Supervisor::new(command, Arc::clone(&bus), &RunnerConfig::default());
/// let _listener = supervisor.listen();
/// supervisor.run().await;
///
/// while let Some(event) = events.recv().await {
///     println!("{event:?}");
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct Supervisor {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("command", &self.inner.command)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    /// Creates a supervisor for `command` publishing on `bus`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(command: Command, bus: Arc<EventBus>, config: &RunnerConfig) -> Self {
        let window = config.restart_debounce();
        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let debouncer = Debouncer::new(window, move || {
                if let Some(inner) = weak.upgrade() {
                    let supervisor = Supervisor { inner };
                    tokio::spawn(async move { supervisor.restart_now().await });
                }
            });
            Inner {
                command,
                bus,
                startup_delay: config.startup_delay(),
                state: Mutex::new(ProcessState::Idle),
                control: Mutex::new(None),
                run_task: tokio::sync::Mutex::new(None),
                master: Mutex::new(None),
                size: Mutex::new(DEFAULT_SIZE),
                debouncer,
                closed: AtomicBool::new(false),
                run_id: Mutex::new(0),
            }
        });
        Self { inner }
    }

    /// The supervised command.
    pub fn command(&self) -> &Command {
        &self.inner.command
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessState {
        *self.inner.state.lock()
    }

    fn set_state(&self, state: ProcessState) {
        let mut current = self.inner.state.lock();
        if *current != state {
            tracing::debug!(from = %*current, to = %state, "process state");
            *current = state;
        }
    }

    /// Runs the command once and blocks until [`stop`](Self::stop).
    ///
    /// Emits `Started`, then spawns the child in a pty and streams its output
    /// from a blocking reader (`Output` chunks in read order, `Stopped` at end
    /// of stream). When the control signal arrives the child's process group
    /// gets SIGTERM and `Killed` is emitted.
    ///
    /// Call it on its own task; see [`spawn_start`](Self::spawn_start).
    ///
    /// # Errors
    ///
    /// Returns the spawn failure after emitting `Error`, without waiting for
    /// a stop signal.
    pub async fn start(&self) -> Result<(), RunError> {
        let control_rx = self.arm();
        self.run_armed(control_rx).await
    }

    /// Installs a fresh control channel, so `stop()` can reach a run that
    /// has been scheduled but not yet polled.
    fn arm(&self) -> oneshot::Receiver<()> {
        let (control_tx, control_rx) = oneshot::channel();
        *self.inner.control.lock() = Some(control_tx);
        control_rx
    }

    async fn run_armed(&self, control_rx: oneshot::Receiver<()>) -> Result<(), RunError> {
        self.set_state(ProcessState::Starting);
        let run = self.begin_run();

        let size = *self.inner.size.lock();
        let Spawned {
            master,
            mut child,
            reader,
        } = match pty::spawn(&self.inner.command, size) {
            Ok(spawned) => spawned,
            Err(err) => {
                self.inner.control.lock().take();
                self.set_state(ProcessState::Errored);
                tracing::warn!(error = %err, "Failed to start");
                self.inner.bus.send_error(err.to_string());
                return Err(err);
            }
        };

        let pid = child.process_id();
        let mut killer = child.clone_killer();
        *self.inner.master.lock() = Some(master);
        self.set_state(ProcessState::Running);

        let reader_task = {
            let supervisor = self.clone();
            tokio::task::spawn_blocking(move || {
                pty::read_loop(reader, |chunk| supervisor.forward_output(run, chunk));
                supervisor.on_stream_end(run);
            })
        };

        tokio::task::spawn_blocking(move || match child.wait() {
            Ok(status) => tracing::debug!(pid = ?pid, code = status.exit_code(), "child exited"),
            Err(err) => tracing::debug!(pid = ?pid, error = %err, "wait failed"),
        });

        // A dropped sender means the supervisor is gone; stop either way.
        let _ = control_rx.await;

        self.set_state(ProcessState::Stopping);
        tracing::info!(pid = ?pid, "Killing process");
        if let Err(err) = pty::terminate(pid, killer.as_mut()) {
            tracing::warn!(error = %err, "Failed to terminate child");
            self.inner.bus.send_error(err.to_string());
        }
        self.inner.bus.send_killed();

        if tokio::time::timeout(STREAM_DRAIN_GRACE, reader_task).await.is_err() {
            tracing::warn!(pid = ?pid, "Output stream still open after SIGTERM");
        }
        self.inner.master.lock().take();
        self.set_state(ProcessState::Stopped);
        Ok(())
    }

    /// Starts a new run id and announces it with `Started`.
    ///
    /// The id is bumped and `Started` sent under one lock, so no output
    /// of an older run can land after it.
    fn begin_run(&self) -> u64 {
        let mut current = self.inner.run_id.lock();
        *current += 1;
        let line = self.inner.command.to_string();
        tracing::info!(command = %line, run = *current, "Starting");
        self.inner.bus.send_started(line);
        *current
    }

    /// Publishes a chunk of run `run`. Returns `false` once a newer run
    /// has started.
    fn forward_output(&self, run: u64, chunk: String) -> bool {
        let current = self.inner.run_id.lock();
        if *current != run {
            return false;
        }
        self.inner.bus.send_output(chunk);
        true
    }

    fn on_stream_end(&self, run: u64) {
        let current = self.inner.run_id.lock();
        if *current != run {
            tracing::debug!(run, "Output of a replaced run ended");
            return;
        }
        {
            let mut state = self.inner.state.lock();
            if *state == ProcessState::Running {
                *state = ProcessState::Stopped;
            }
        }
        tracing::info!("Process output ended");
        self.inner.bus.send_stopped();
    }

    /// Unblocks a pending [`start`](Self::start).
    ///
    /// Returns `false` without blocking when nothing is running.
    pub fn stop(&self) -> bool {
        match self.inner.control.lock().take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Runs [`start`](Self::start) on a background task.
    fn spawn_run(&self) -> JoinHandle<()> {
        let control_rx = self.arm();
        let supervisor = self.clone();
        tokio::spawn(async move {
            if let Err(err) = supervisor.run_armed(control_rx).await {
                tracing::debug!(error = %err, "run ended with error");
            }
        })
    }

    /// Stops the current run, waits for it to finish, then starts a new one.
    ///
    /// Concurrent calls are serialized so two children never overlap.
    pub async fn restart_now(&self) {
        let mut run_task = self.inner.run_task.lock().await;
        self.stop();
        if let Some(previous) = run_task.take() {
            if let Err(err) = previous.await {
                tracing::warn!(error = %err, "previous run task failed");
            }
        }
        if self.inner.closed.load(Ordering::Acquire) {
            return;
        }
        *run_task = Some(self.spawn_run());
    }

    /// Starts a new run on a background task, replacing the current one.
    pub async fn spawn_start(&self) {
        self.restart_now().await;
    }

    /// Requests a debounced restart.
    ///
    /// Requests inside the debounce window collapse into one stop/start
    /// cycle, fired one window after the last request.
    pub fn restart(&self) {
        tracing::debug!("restart requested");
        self.inner.debouncer.call();
    }

    /// Number of debounced restarts that have fired.
    pub fn restarts_fired(&self) -> u64 {
        self.inner.debouncer.fired()
    }

    /// Applies the startup delay, then launches the first run.
    pub async fn run(&self) {
        tokio::time::sleep(self.inner.startup_delay).await;
        self.spawn_start().await;
    }

    /// Restarts on every `RequestRestart` published on the bus.
    ///
    /// Abort the returned handle to stop listening.
    pub fn listen(&self) -> JoinHandle<()> {
        let mut events = self.inner.bus.subscribe();
        let supervisor = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if event == BusEvent::RequestRestart {
                    supervisor.restart();
                }
            }
        })
    }

    /// Resizes the pty of the running child, and of future runs.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Pty`] if the live pty rejects the size.
    pub fn resize(&self, cols: u16, rows: u16) -> Result<(), RunError> {
        let size = pty::pty_size(cols, rows);
        {
            let mut current = self.inner.size.lock();
            if *current == size {
                return Ok(());
            }
            *current = size;
        }
        if let Some(master) = self.inner.master.lock().as_ref() {
            master.resize(size).map_err(RunError::pty)?;
        }
        Ok(())
    }

    /// Cancels pending restarts, stops the child, and waits for the run to end.
    pub async fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.debouncer.cancel();
        self.stop();
        let mut run_task = self.inner.run_task.lock().await;
        // A restart that passed its closed check before we got here has
        // armed a new run under this lock.
        self.stop();
        if let Some(handle) = run_task.take() {
            let _ = handle.await;
        }
        tracing::info!("Supervisor stopped");
    }
}
