//! Recording session lifecycle.
//!
//! While recording, a worker thread owns the [`EventRouter`] and applies
//! every event the hook backend delivers. Stopping uninstalls the hook,
//! joins the worker, takes the router back and saves the canvas.

pub mod router;

use crate::canvas::{SaveError, SaveOptions, SharedCanvas};
use crate::hook::{HookBackend, InputEvent};
use crate::preview::PreviewSurface;
use crate::tracker::Palette;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

pub use router::{EventRouter, TrackerSwitches};

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a recording session is already running")]
    AlreadyRecording,

    #[error("no recording session is running")]
    NotRecording,

    #[error("failed to install mouse hook: {0:#}")]
    Hook(anyhow::Error),

    #[error("event router was lost by an earlier listener failure")]
    RouterLost,

    #[error("canvas lock poisoned")]
    CanvasPoisoned,

    #[error(transparent)]
    Save(#[from] SaveError),
}

struct WorkerHandle {
    stop_tx: Sender<()>,
    join: JoinHandle<EventRouter>,
}

pub struct SessionController {
    backend: Box<dyn HookBackend>,
    canvas: SharedCanvas,
    save_options: SaveOptions,
    switches: Option<TrackerSwitches>,
    router: Option<EventRouter>,
    worker: Option<WorkerHandle>,
}

impl SessionController {
    pub fn new(
        backend: Box<dyn HookBackend>,
        canvas: SharedCanvas,
        router: EventRouter,
        save_options: SaveOptions,
    ) -> Self {
        Self {
            backend,
            canvas,
            save_options,
            switches: router.switches(),
            router: Some(router),
            worker: None,
        }
    }

    /// Controller with the standard trackers and default save options.
    pub fn with_preview<P>(
        backend: Box<dyn HookBackend>,
        canvas: SharedCanvas,
        preview: P,
        palette: &Palette,
    ) -> Self
    where
        P: PreviewSurface + Clone + 'static,
    {
        let router = EventRouter::standard(&canvas, preview, palette);
        Self::new(backend, canvas, router, SaveOptions::default())
    }

    pub fn set_save_options(&mut self, options: SaveOptions) {
        self.save_options = options;
    }

    pub fn switches(&self) -> Option<&TrackerSwitches> {
        self.switches.as_ref()
    }

    pub fn state(&self) -> SessionState {
        if self.worker.is_some() {
            SessionState::Recording
        } else {
            SessionState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state() == SessionState::Recording
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.worker.is_some() {
            return Err(SessionError::AlreadyRecording);
        }
        let mut router = self.router.take().ok_or(SessionError::RouterLost)?;
        router.reset();

        let (event_tx, event_rx) = mpsc::channel();
        if let Err(err) = self.backend.install(event_tx) {
            tracing::error!(?err, "failed to install mouse hook");
            self.router = Some(router);
            return Err(SessionError::Hook(err));
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let join = thread::spawn(move || worker_loop(router, event_rx, stop_rx));
        self.worker = Some(WorkerHandle { stop_tx, join });

        tracing::info!("recording session started");
        Ok(())
    }

    /// Blocks until the worker has exited, then saves the canvas. No event
    /// is applied after this returns.
    pub fn stop(&mut self) -> Result<PathBuf, SessionError> {
        let worker = self.worker.take().ok_or(SessionError::NotRecording)?;
        self.join_worker(worker);
        tracing::info!("recording session stopped");

        let mut canvas = self
            .canvas
            .lock()
            .map_err(|_| SessionError::CanvasPoisoned)?;
        let path = canvas.save(&self.save_options)?;
        Ok(path)
    }

    fn join_worker(&mut self, worker: WorkerHandle) {
        if let Err(err) = self.backend.uninstall() {
            tracing::error!(?err, "failed to uninstall mouse hook");
        }
        let _ = worker.stop_tx.send(());
        match worker.join.join() {
            Ok(router) => self.router = Some(router),
            Err(payload) => {
                tracing::error!("session listener thread panicked");
                std::panic::resume_unwind(payload);
            }
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.backend.uninstall();
            let _ = worker.stop_tx.send(());
            let _ = worker.join.join();
        }
    }
}

fn worker_loop(
    mut router: EventRouter,
    event_rx: Receiver<InputEvent>,
    stop_rx: Receiver<()>,
) -> EventRouter {
    loop {
        match event_rx.recv_timeout(STOP_POLL_INTERVAL) {
            Ok(event) => router.dispatch(event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        match stop_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => {
                // The hook is uninstalled before the stop signal is sent, so
                // anything still queued was captured during the session.
                while let Ok(event) = event_rx.try_recv() {
                    router.dispatch(event);
                }
                break;
            }
            Err(TryRecvError::Empty) => {}
        }
    }
    router
}
