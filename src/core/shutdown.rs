use crate::infrastructure::terminal::RawModeController;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

/// How the process ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Escape key typed on the local terminal
    Escaped,
    /// Configuration, setup or relay failure, or an interrupt
    Failed,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Escaped => 0,
            Outcome::Failed => 1,
        }
    }
}

struct Inner {
    finished: AtomicBool,
    raw_mode: Mutex<Option<Box<dyn RawModeController>>>,
    trigger: watch::Sender<Option<String>>,
}

/// Shared shutdown entry point.
///
/// Cloned into the signal listener and kept by the main path. `trigger`
/// wakes whatever is waiting on `triggered`; `finish` does the cleanup and
/// only the first call has any effect.
#[derive(Clone)]
pub struct ShutdownHandle {
    inner: Arc<Inner>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (trigger, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                finished: AtomicBool::new(false),
                raw_mode: Mutex::new(None),
                trigger,
            }),
        }
    }

    /// Hands over a terminal that is already in raw mode; `finish` restores it.
    pub fn install_raw_mode(&self, controller: Box<dyn RawModeController>) {
        let mut slot = self.inner.raw_mode.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(controller);
    }

    /// Asks the running session to stop. The first reason wins.
    pub fn trigger(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.inner.trigger.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            debug!("Shutdown requested: {}", reason);
            *current = Some(reason);
            true
        });
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.trigger.borrow().is_some()
    }

    /// Resolves with the trigger reason once `trigger` has been called.
    pub async fn triggered(&self) -> String {
        let mut rx = self.inner.trigger.subscribe();
        loop {
            if let Some(reason) = rx.borrow_and_update().clone() {
                return reason;
            }
            if rx.changed().await.is_err() {
                // The sender lives in `inner`, which we hold
                std::future::pending::<()>().await;
            }
        }
    }

    /// Restores the terminal and ends the diagnostic line. Returns false when
    /// an earlier call already did it.
    pub fn finish(&self) -> bool {
        if self.inner.finished.swap(true, Ordering::SeqCst) {
            return false;
        }

        let controller = self
            .inner
            .raw_mode
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(mut controller) = controller {
            if let Err(e) = controller.restore() {
                warn!("{}", e);
            }
        }

        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\r\n");
        let _ = stderr.flush();
        true
    }

    pub fn is_finished(&self) -> bool {
        self.inner.finished.load(Ordering::SeqCst)
    }

    /// Cleans up, prints `diagnostic` if any, and exits with the outcome's status.
    pub fn exit(&self, outcome: Outcome, diagnostic: Option<&str>) -> ! {
        self.finish();
        if let Some(message) = diagnostic {
            eprintln!("{}", message);
        }
        std::process::exit(outcome.exit_code())
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}
