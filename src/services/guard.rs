//! Guarded execution of remote operations
//!
//! Remote calls run on detached worker threads and report back over an
//! mpsc channel, drained by `poll` on every tick. The busy indicator is
//! reference counted over the set of pending operations, never a single
//! boolean, so overlapping calls cannot hide each other's indicator. Each
//! spawn issues a monotonically increasing generation token per logical
//! slot; completions whose token has been superseded must not be applied
//! to state.
//!
//! There is no cancellation: an operation that outlives its deadline is
//! pruned from the pending set (releasing the indicator) while the worker
//! thread keeps running, and its eventual completion is still delivered.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::model::{ColumnValues, DatasetKind, FilterOutcome, PageView, SummaryResponse};
use crate::services::api::{
    AnalysisKind, AnalysisOutcome, ApiError, DownloadOutcome, UploadOutcome,
};

/// Hard ceiling on how long the blocking indicator may stay up for one
/// operation, even if the remote call never settles
pub const INDICATOR_CEILING: Duration = Duration::from_secs(30);

/// Logical operation slots; tokens are tracked per slot so a late response
/// is discarded only when a newer request of the same kind superseded it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpSlot {
    Summary,
    PageData(DatasetKind),
    ColumnValues,
    Filter,
    Columns,
    Genes,
    Analysis,
    Reset,
    Upload,
    Download,
}

/// What a finished worker thread produced
#[derive(Debug)]
pub enum RemoteOutcome {
    Summary(Result<SummaryResponse, ApiError>),
    PageData {
        kind: DatasetKind,
        result: Result<PageView, ApiError>,
    },
    ColumnValues(Result<ColumnValues, ApiError>),
    FilterApplied(Result<FilterOutcome, ApiError>),
    Columns(Result<Vec<String>, ApiError>),
    Genes(Result<Vec<String>, ApiError>),
    Analysis {
        kind: AnalysisKind,
        result: Result<AnalysisOutcome, ApiError>,
    },
    Reset(Result<String, ApiError>),
    Upload(Result<UploadOutcome, ApiError>),
    Download(Result<DownloadOutcome, ApiError>),
}

/// A completion message from a worker thread
#[derive(Debug)]
pub struct Completion {
    pub slot: OpSlot,
    pub token: u64,
    pub outcome: RemoteOutcome,
}

/// One in-flight guarded operation
#[derive(Debug, Clone)]
pub struct PendingOperation {
    pub id: u64,
    pub started_at: Instant,
    pub deadline: Instant,
}

/// Tracks in-flight remote operations and the blocking-indicator lifecycle
pub struct OperationGuard {
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    pending: Vec<PendingOperation>,
    latest: HashMap<OpSlot, u64>,
    next_id: u64,
    ceiling: Duration,
}

impl Default for OperationGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationGuard {
    pub fn new() -> Self {
        Self::with_ceiling(INDICATOR_CEILING)
    }

    pub fn with_ceiling(ceiling: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: Vec::new(),
            latest: HashMap::new(),
            next_id: 0,
            ceiling,
        }
    }

    /// Run `f` on a worker thread behind the blocking indicator.
    /// Returns the generation token issued for `slot`.
    pub fn spawn<F>(&mut self, slot: OpSlot, f: F) -> u64
    where
        F: FnOnce() -> RemoteOutcome + Send + 'static,
    {
        self.launch(slot, f, true)
    }

    /// Run `f` without raising the blocking indicator (background refresh
    /// work such as summary loads and selector population). The token is
    /// still issued so stale completions are discarded the same way.
    pub fn spawn_quiet<F>(&mut self, slot: OpSlot, f: F) -> u64
    where
        F: FnOnce() -> RemoteOutcome + Send + 'static,
    {
        self.launch(slot, f, false)
    }

    fn launch<F>(&mut self, slot: OpSlot, f: F, visible: bool) -> u64
    where
        F: FnOnce() -> RemoteOutcome + Send + 'static,
    {
        self.next_id += 1;
        let id = self.next_id;
        self.latest.insert(slot, id);

        if visible {
            let now = Instant::now();
            self.pending.push(PendingOperation {
                id,
                started_at: now,
                deadline: now + self.ceiling,
            });
        }

        let sender = self.sender.clone();
        thread::spawn(move || {
            let outcome = f();
            // The receiver only goes away on shutdown
            let _ = sender.send(Completion {
                slot,
                token: id,
                outcome,
            });
        });

        id
    }

    /// Drain completions received since the last poll. Each completion
    /// settles its pending entry; an entry already pruned by the deadline
    /// is simply absent, so nothing is decremented twice.
    pub fn poll(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        while let Ok(completion) = self.receiver.try_recv() {
            self.pending.retain(|p| p.id != completion.token);
            completions.push(completion);
        }
        completions
    }

    /// Release indicator slots whose deadline has passed. The worker
    /// threads behind them are not stopped; their completions are still
    /// delivered and still subject to the token check.
    pub fn prune_expired(&mut self, now: Instant) {
        self.pending.retain(|p| p.deadline > now);
    }

    /// Whether `token` is still the latest issued for `slot`
    pub fn is_current(&self, slot: OpSlot, token: u64) -> bool {
        self.latest.get(&slot) == Some(&token)
    }

    /// The blocking indicator is visible iff any operation is pending
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Start of the oldest pending operation, for elapsed-time display
    pub fn busy_since(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.started_at).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Poll until at least `n` completions arrive or the timeout elapses
    fn poll_until(guard: &mut OperationGuard, n: usize) -> Vec<Completion> {
        let mut completions = Vec::new();
        for _ in 0..200 {
            completions.extend(guard.poll());
            if completions.len() >= n {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        completions
    }

    #[test]
    fn test_indicator_reference_counts_overlapping_operations() {
        let mut guard = OperationGuard::new();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        guard.spawn(OpSlot::Summary, || RemoteOutcome::Reset(Ok("fast".into())));
        guard.spawn(OpSlot::Filter, move || {
            release_rx.recv().ok();
            RemoteOutcome::Reset(Ok("slow".into()))
        });
        assert_eq!(guard.pending_count(), 2);

        // The fast operation settles first; the indicator must stay up
        // for the one still in flight.
        let completions = poll_until(&mut guard, 1);
        assert_eq!(completions.len(), 1);
        assert!(guard.is_busy());

        release_tx.send(()).unwrap();
        poll_until(&mut guard, 1);
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_indicator_releases_at_deadline_without_settlement() {
        let mut guard = OperationGuard::with_ceiling(Duration::ZERO);
        // Keep the sender alive so the worker never settles during the test
        let (_hold_tx, hold_rx) = mpsc::channel::<()>();

        guard.spawn(OpSlot::Analysis, move || {
            hold_rx.recv().ok();
            RemoteOutcome::Reset(Ok(String::new()))
        });
        assert!(guard.is_busy());

        guard.prune_expired(Instant::now());
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_late_completion_after_prune_is_not_double_counted() {
        let mut guard = OperationGuard::with_ceiling(Duration::ZERO);
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let token = guard.spawn(OpSlot::Reset, move || {
            release_rx.recv().ok();
            RemoteOutcome::Reset(Ok("late".into()))
        });

        guard.prune_expired(Instant::now());
        assert!(!guard.is_busy());

        // The late completion still arrives and is still current
        release_tx.send(()).unwrap();
        let completions = poll_until(&mut guard, 1);
        assert_eq!(completions.len(), 1);
        assert!(guard.is_current(OpSlot::Reset, token));
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_newer_spawn_supersedes_older_token() {
        let mut guard = OperationGuard::new();
        let first = guard.spawn_quiet(OpSlot::Summary, || {
            RemoteOutcome::Reset(Ok(String::new()))
        });
        let second = guard.spawn_quiet(OpSlot::Summary, || {
            RemoteOutcome::Reset(Ok(String::new()))
        });

        assert!(!guard.is_current(OpSlot::Summary, first));
        assert!(guard.is_current(OpSlot::Summary, second));

        // Tokens are tracked per slot, not globally
        let other = guard.spawn_quiet(OpSlot::Columns, || {
            RemoteOutcome::Reset(Ok(String::new()))
        });
        assert!(guard.is_current(OpSlot::Columns, other));
        assert!(guard.is_current(OpSlot::Summary, second));
    }

    #[test]
    fn test_quiet_spawn_does_not_raise_indicator() {
        let mut guard = OperationGuard::new();
        guard.spawn_quiet(OpSlot::Summary, || {
            RemoteOutcome::Reset(Ok(String::new()))
        });
        assert!(!guard.is_busy());
        // The completion is still delivered
        let completions = poll_until(&mut guard, 1);
        assert_eq!(completions.len(), 1);
    }
}
