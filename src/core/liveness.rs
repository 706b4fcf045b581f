//! Background liveness check. Runs on its own thread at a fixed interval and
//! only observes; it never touches the roster.

use crate::errors::AppResult;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

pub struct Heartbeat {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    beats: Arc<AtomicU64>,
}

impl Heartbeat {
    /// Call `probe` every `interval` until stopped. `Err` from the probe is
    /// logged as a warning.
    pub fn spawn<F>(interval: Duration, mut probe: F) -> AppResult<Self>
    where
        F: FnMut() -> Result<String, String> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<()>();
        let beats = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&beats);

        let handle = thread::Builder::new()
            .name("heartbeat".into())
            .spawn(move || {
                loop {
                    match rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
                            match probe() {
                                Ok(status) => info!(beat = n, %status, "alive"),
                                Err(e) => warn!(beat = n, error = %e, "liveness probe failed"),
                            }
                        }
                        // stop requested or handle dropped
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Self {
            stop: Some(tx),
            handle: Some(handle),
            beats,
        })
    }

    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::Relaxed)
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Probe reporting the age of the snapshot file, read-only.
pub fn snapshot_probe(path: PathBuf) -> impl FnMut() -> Result<String, String> + Send + 'static {
    move || {
        let meta = std::fs::metadata(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let age = meta
            .modified()
            .ok()
            .and_then(|m| SystemTime::now().duration_since(m).ok())
            .map(|d| format!("snapshot saved {}s ago", d.as_secs()))
            .unwrap_or_else(|| "snapshot present".to_string());
        Ok(age)
    }
}
