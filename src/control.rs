//! Progress reporting and cooperative cancellation.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A progress snapshot: anchor offsets scanned so far out of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub processed: u64,
    pub total: u64,
}

impl Progress {
    /// Completion in percent, `100` when there is nothing to do.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.processed.min(self.total) * 100 / self.total) as u8
    }
}

/// Receives periodic progress updates from a running search.
///
/// Scan workers never call a sink directly: updates go through a bounded
/// queue and are delivered from a separate relay thread, so a slow sink
/// only sees fewer, more recent snapshots.
pub trait ProgressSink: Sync {
    fn report(&self, processed: u64, total: u64);
}

impl<F> ProgressSink for F
where
    F: Fn(u64, u64) + Sync,
{
    fn report(&self, processed: u64, total: u64) {
        self(processed, total)
    }
}

/// Forwards updates over a channel with `try_send`; updates that do not
/// fit into a bounded channel are dropped.
#[derive(Debug, Clone)]
pub struct ChannelProgress(pub Sender<Progress>);

impl ProgressSink for ChannelProgress {
    fn report(&self, processed: u64, total: u64) {
        match self.0.try_send(Progress { processed, total }) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => {
                log::trace!("progress receiver disconnected");
            }
        }
    }
}

/// Deliver queued snapshots to `sink` until every sender is gone.
///
/// Snapshots that piled up while `sink` was busy are collapsed into the
/// newest one.
pub(crate) fn relay(updates: Receiver<Progress>, sink: &dyn ProgressSink) {
    while let Ok(first) = updates.recv() {
        let latest = updates.try_iter().last().unwrap_or(first);
        sink.report(latest.processed, latest.total);
    }
}

/// A sink that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _processed: u64, _total: u64) {}
}

/// Shared flag used to abandon a search.
///
/// Cloning yields a handle to the same flag, so a watchdog thread can hold
/// one clone while the search holds another.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Marker returned internally when a cancellation was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Progress sink and cancellation token for one search.
pub struct SearchControl<'a> {
    pub progress: &'a dyn ProgressSink,
    pub cancel: CancelToken,
}

impl<'a> SearchControl<'a> {
    pub fn new(progress: &'a dyn ProgressSink, cancel: CancelToken) -> Self {
        SearchControl { progress, cancel }
    }

    /// `Err(Cancelled)` once the token has been triggered.
    #[inline]
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.cancel.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for SearchControl<'static> {
    fn default() -> Self {
        SearchControl {
            progress: &NoProgress,
            cancel: CancelToken::new(),
        }
    }
}
