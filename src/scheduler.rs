//! Cancellable repeating task
//!
//! The callback runs on a dedicated thread: once right away, then again each
//! time `interval` has passed since the previous run returned. The wait is a
//! `recv_timeout` on a stop channel, so [`Scheduler::stop`] interrupts it
//! immediately instead of waiting out the interval.

use std::ops::ControlFlow;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{Error, Result};

const THREAD_NAME: &str = "refresh-scheduler";

/// Handle to a running repeating task
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Start calling `callback` every `interval` until stopped
    ///
    /// Returning [`ControlFlow::Break`] from the callback ends the chain.
    pub fn schedule<F>(interval: Duration, mut callback: F) -> Result<Self>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let mut ticks: u64 = 0;
                loop {
                    ticks += 1;
                    if callback().is_break() {
                        log::debug!("scheduler chain ended by callback after {} ticks", ticks);
                        break;
                    }
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                            log::debug!("scheduler cancelled after {} ticks", ticks);
                            break;
                        }
                    }
                }
            })
            .map_err(Error::Spawn)?;

        log::debug!("scheduler started with interval {:?}", interval);

        Ok(Self {
            interval,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the worker thread is still alive
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Cancel the task and wait for an in-flight callback to return
    ///
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The worker may already be gone if the callback broke the chain.
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("scheduler thread panicked");
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
