//! Cancellable one-second countdown.
//!
//! The timer owns both the ticking task and the receiving end of its channel.
//! Dropping or cancelling the timer stops the task and discards any ticks not
//! yet drained, so a replaced session can never see a tick meant for its
//! predecessor.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, instrument, trace};

/// Handle to a running countdown task.
#[derive(Debug)]
pub struct CountdownTimer {
    ticks: mpsc::UnboundedReceiver<()>,
    abort_handle: tokio::task::AbortHandle,
    period: Duration,
    cancelled: bool,
}

impl CountdownTimer {
    /// Spawns a task that sends one tick per `period`, the first one
    /// `period` after the call.
    ///
    /// Must be called from inside a tokio runtime.
    #[instrument]
    pub fn spawn(period: Duration) -> Self {
        let (tx, ticks) = mpsc::unbounded_channel();
        let first = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    trace!("Tick receiver gone, stopping");
                    break;
                }
            }
        });
        debug!("Countdown timer spawned");
        Self {
            ticks,
            abort_handle: handle.abort_handle(),
            period,
            cancelled: false,
        }
    }

    /// Number of ticks delivered since the last call. Never blocks.
    pub fn drain(&mut self) -> u32 {
        let mut count = 0;
        while self.ticks.try_recv().is_ok() {
            count += 1;
        }
        if count > 0 {
            trace!(count, "Drained ticks");
        }
        count
    }

    /// Stops the task and throws away undelivered ticks.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.abort_handle.abort();
        self.ticks.close();
        while self.ticks.try_recv().is_ok() {}
        self.cancelled = true;
        debug!("Countdown timer cancelled");
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Interval between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}
