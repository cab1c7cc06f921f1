//! Fire-and-forget persistence of day commits.
//!
//! The gesture controller never waits for storage. Commits are queued on an
//! unbounded channel and written in order by a worker that owns the
//! repository on tokio's blocking pool. Every write reports a
//! [`WriteOutcome`]; failed writes are not retried and the in-memory
//! schedule keeps the committed state.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::repository::ScheduleRepository;
use crate::error::StorageError;
use crate::events::DayCommit;

/// Result of persisting one commit.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Saved(DayCommit),
    Failed { commit: DayCommit, error: String },
}

impl WriteOutcome {
    pub fn commit(&self) -> &DayCommit {
        match self {
            WriteOutcome::Saved(commit) | WriteOutcome::Failed { commit, .. } => commit,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, WriteOutcome::Saved(_))
    }
}

/// Handle for queueing commits. Cheap to clone; the worker stops once every
/// handle is dropped and hands the repository back through its join handle.
#[derive(Debug, Clone)]
pub struct CommitWriter {
    tx: mpsc::UnboundedSender<DayCommit>,
}

impl CommitWriter {
    /// Start the worker. Must be called from inside a tokio runtime.
    pub fn spawn<R>(repo: R) -> (Self, mpsc::UnboundedReceiver<WriteOutcome>, JoinHandle<R>)
    where
        R: ScheduleRepository + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<DayCommit>();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let handle = tokio::task::spawn_blocking(move || {
            let mut repo = repo;
            while let Some(commit) = rx.blocking_recv() {
                let outcome = match repo.set_day_slots(
                    &commit.employee_id,
                    &commit.week,
                    commit.day,
                    &commit.slots,
                ) {
                    Ok(()) => {
                        info!(
                            employee = %commit.employee_id,
                            week = %commit.week,
                            day = ?commit.day,
                            "commit saved"
                        );
                        WriteOutcome::Saved(commit)
                    }
                    Err(e) => {
                        warn!(
                            employee = %commit.employee_id,
                            week = %commit.week,
                            day = ?commit.day,
                            error = %e,
                            "commit could not be saved"
                        );
                        WriteOutcome::Failed {
                            commit,
                            error: e.to_string(),
                        }
                    }
                };
                // Nobody listening is fine.
                let _ = outcome_tx.send(outcome);
            }
            repo
        });

        (Self { tx }, outcome_rx, handle)
    }

    /// Queue `commit` for writing. Never blocks.
    ///
    /// # Errors
    /// Returns `StorageError::WriterClosed` if the worker has stopped.
    pub fn submit(&self, commit: DayCommit) -> Result<(), StorageError> {
        self.tx.send(commit).map_err(|_| StorageError::WriterClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::WeekSchedule;
    use crate::slot::{Category, EmployeeId, TimeSlot, WeekKey};
    use crate::storage::MemoryRepository;
    use chrono::Weekday;

    struct LockedRepository;

    impl ScheduleRepository for LockedRepository {
        fn get_day_slots(
            &self,
            _: &EmployeeId,
            _: &WeekKey,
            _: Weekday,
        ) -> Result<Vec<TimeSlot>, StorageError> {
            Err(StorageError::Locked)
        }

        fn set_day_slots(
            &mut self,
            _: &EmployeeId,
            _: &WeekKey,
            _: Weekday,
            _: &[TimeSlot],
        ) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }

        fn load_week(&self, _: &WeekKey) -> Result<WeekSchedule, StorageError> {
            Err(StorageError::Locked)
        }
    }

    fn commit(day: Weekday, start: i32) -> DayCommit {
        DayCommit::new(
            "e1".into(),
            "2026-W42".parse().unwrap(),
            day,
            vec![TimeSlot::new(start, start + 60, Category::Work)],
        )
    }

    #[tokio::test]
    async fn saves_in_submission_order() {
        let (writer, mut outcomes, handle) = CommitWriter::spawn(MemoryRepository::new());
        writer.submit(commit(Weekday::Mon, 540)).unwrap();
        writer.submit(commit(Weekday::Mon, 600)).unwrap();
        drop(writer);

        let first = outcomes.recv().await.unwrap();
        let second = outcomes.recv().await.unwrap();
        assert!(first.is_saved() && second.is_saved());
        assert_eq!(second.commit().slots[0].start, 600);

        let repo = handle.await.unwrap();
        let week: WeekKey = "2026-W42".parse().unwrap();
        let stored = repo.get_day_slots(&"e1".into(), &week, Weekday::Mon).unwrap();
        assert_eq!(stored[0].start, 600);
    }

    #[tokio::test]
    async fn failures_are_reported_not_retried() {
        let (writer, mut outcomes, handle) = CommitWriter::spawn(LockedRepository);
        writer.submit(commit(Weekday::Tue, 540)).unwrap();
        drop(writer);

        match outcomes.recv().await.unwrap() {
            WriteOutcome::Failed { commit, error } => {
                assert_eq!(commit.day, Weekday::Tue);
                assert!(error.contains("locked"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(outcomes.recv().await.is_none());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn worker_runs_until_last_handle_drops() {
        let (writer, _outcomes, handle) = CommitWriter::spawn(MemoryRepository::new());
        let extra = writer.clone();
        drop(writer);
        assert!(extra.submit(commit(Weekday::Wed, 540)).is_ok());
        drop(extra);
        let repo = handle.await.unwrap();
        assert_eq!(repo.len(), 1);
    }
}
