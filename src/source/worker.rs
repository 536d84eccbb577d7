//! Single background thread with a cooperative stop flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::error::{FilterToolError, Result};

/// Owns at most one acquisition thread.
///
/// The thread body receives the shared running flag, polls it, and clears it
/// itself when it runs out of work.
#[derive(Debug, Default)]
pub struct Acquisition {
    running: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Acquisition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn `body` unless a thread is already running. Returns `Ok(false)`
    /// when one was.
    pub fn start<F>(&self, name: &str, body: F) -> Result<bool>
    where
        F: FnOnce(Arc<AtomicBool>) + Send + 'static,
    {
        let mut handle = self.handle.lock();
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        // Reap a thread that already finished on its own.
        if let Some(previous) = handle.take() {
            if previous.join().is_err() {
                tracing::warn!("Previous {} thread panicked", name);
            }
        }

        let running = self.running.clone();
        let spawned = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || body(running));
        match spawned {
            Ok(h) => {
                *handle = Some(h);
                tracing::info!("Started {} thread", name);
                Ok(true)
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(FilterToolError::Source(format!(
                    "Failed to spawn {} thread: {}",
                    name, e
                )))
            }
        }
    }

    /// Clear the running flag and join the thread. Safe to call repeatedly.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().take() {
            let name = handle.thread().name().unwrap_or("acquisition").to_string();
            if handle.join().is_err() {
                tracing::warn!("{} thread panicked", name);
            } else {
                tracing::info!("Stopped {} thread", name);
            }
        }
    }
}

impl Drop for Acquisition {
    fn drop(&mut self) {
        self.stop();
    }
}
