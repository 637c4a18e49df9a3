//! Frame ticker
//!
//! Drives an [`Animated`] value at a fixed period on a tokio task until the
//! value reports it is done or the handle is dropped.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

use crate::tokens::duration;

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Schedule another frame
    Continue,
    /// The animation finished
    Done,
}

/// Something advanced once per frame
pub trait Animated: Send + 'static {
    /// Advance one frame
    fn tick(&mut self) -> Tick;
}

/// Default frame period (~60 Hz)
pub fn frame_period() -> Duration {
    Duration::from_millis(duration::FRAME)
}

/// Handle to a running ticker
///
/// When dropped, the ticker stops before its next frame.
pub struct TickerHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TickerHandle {
    /// Tick `target` every `period`, starting one period from now
    pub fn start<T: Animated>(period: Duration, target: Arc<Mutex<T>>) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut frames = interval_at(Instant::now() + period, period);
            frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    _ = &mut stop_rx => {
                        trace!("ticker cancelled");
                        break;
                    }
                    _ = frames.tick() => {
                        if target.lock().tick() == Tick::Done {
                            trace!("ticker finished");
                            break;
                        }
                    }
                }
            }
        });

        TickerHandle {
            stop_tx: Some(stop_tx),
            handle,
        }
    }

    /// Whether the ticker task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop ticking
    pub fn stop(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
