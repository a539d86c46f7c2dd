use crate::config::TokenCacheConfig;
use crossbeam_channel::{select, tick, Sender};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Something that periodically drops stale state.
pub trait Sweep: Send + Sync {
    /// Returns how many entries were removed.
    fn sweep(&self) -> usize;
}

/// Background thread calling [`Sweep::sweep`] on a fixed interval.
///
/// Stops, and joins its thread, on [`Janitor::stop`] or drop.
pub struct Janitor {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Janitor {
    pub fn spawn<S>(target: Arc<S>, interval: Duration) -> io::Result<Self>
    where
        S: Sweep + 'static,
    {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let ticker = tick(interval.max(MIN_INTERVAL));
        let handle = thread::Builder::new()
            .name("janitor".to_owned())
            .spawn(move || {
                loop {
                    let stop = select! {
                        recv(stop_rx) -> _ => true,
                        recv(ticker) -> _ => false,
                    };
                    if stop {
                        break;
                    }
                    let removed = target.sweep();
                    if removed > 0 {
                        debug!(removed, "janitor sweep");
                    }
                }
                debug!("janitor stopped");
            })?;
        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Sweeps on the interval named by `config`.
    pub fn from_config<S>(target: Arc<S>, config: &TokenCacheConfig) -> io::Result<Self>
    where
        S: Sweep + 'static,
    {
        Self::spawn(target, config.sweep_interval())
    }

    pub fn stop(self) {
        drop(self);
    }

    fn shutdown(&mut self) {
        // disconnecting the channel wakes the thread
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("janitor thread panicked");
            }
        }
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs the sweep loop as a tokio task. Abort the handle to stop it.
#[cfg(feature = "tokio")]
pub fn spawn_tokio<S>(target: Arc<S>, interval: Duration) -> tokio::task::JoinHandle<()>
where
    S: Sweep + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(MIN_INTERVAL));
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = target.sweep();
            if removed > 0 {
                debug!(removed, "janitor sweep");
            }
        }
    })
}
