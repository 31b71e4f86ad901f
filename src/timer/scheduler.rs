//! Logical-clock task scheduler.
//!
//! The host feeds elapsed wall-clock time in; due tasks come out one at a
//! time in due order. Each task carries the generation it was scheduled
//! under so the owner can drop tasks from a superseded timer or round.
//!
//! ```
//! use memory_match::timer::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.schedule(1000, 0, "tick");
//! scheduler.schedule(500, 0, "conceal");
//!
//! let target = scheduler.now_ms() + 1500;
//! let mut fired = Vec::new();
//! while let Some(entry) = scheduler.pop_due(target) {
//!     fired.push(entry.task);
//! }
//! scheduler.settle(target);
//!
//! assert_eq!(fired, vec!["conceal", "tick"]);
//! assert_eq!(scheduler.now_ms(), 1500);
//! ```

use serde::{Deserialize, Serialize};

/// Handle for cancelling a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// A task waiting for its due time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduled<T> {
    /// Cancellation handle.
    pub id: TaskId,
    /// Logical time the task fires at.
    pub due_ms: u64,
    /// Generation the task was scheduled under.
    pub generation: u64,
    /// Payload.
    pub task: T,
}

/// Single-threaded scheduler over a logical millisecond clock.
///
/// Tasks due at the same instant fire in the order they were scheduled.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create a scheduler at logical time zero.
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current logical time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `task` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, generation: u64, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            generation,
            task,
        });
        id
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.id != id);
        self.pending.len() != before
    }

    /// Cancel every task matching `pred`. Returns how many were dropped.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&Scheduled<T>) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|entry| !pred(entry));
        before - self.pending.len()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of tasks waiting.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|entry| entry.due_ms).min()
    }

    /// Remove and return the earliest task due at or before `until_ms`.
    ///
    /// The clock moves to that task's due time, so anything scheduled while
    /// handling it is timed from when it fired, not from `until_ms`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Scheduled<T>> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_ms <= until_ms)
            .min_by_key(|(_, entry)| (entry.due_ms, entry.id))
            .map(|(idx, _)| idx)?;

        let entry = self.pending.remove(idx);
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some(entry)
    }

    /// Move the clock to `until_ms` once every due task has been popped.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(scheduler: &mut Scheduler<T>, elapsed_ms: u64) -> Vec<T> {
        let target = scheduler.now_ms() + elapsed_ms;
        let mut out = Vec::new();
        while let Some(entry) = scheduler.pop_due(target) {
            out.push(entry.task);
        }
        scheduler.settle(target);
        out
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, 0, 'c');
        scheduler.schedule(100, 0, 'a');
        scheduler.schedule(200, 0, 'b');

        assert_eq!(scheduler.next_due(), Some(100));
        assert_eq!(drain(&mut scheduler, 250), vec!['a', 'b']);
        assert_eq!(scheduler.now_ms(), 250);
        assert_eq!(drain(&mut scheduler, 50), vec!['c']);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, 0, 1);
        scheduler.schedule(100, 0, 2);
        scheduler.schedule(100, 0, 3);

        assert_eq!(drain(&mut scheduler, 100), vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1000, 0, ());
        assert!(drain(&mut scheduler, 999).is_empty());
        assert_eq!(drain(&mut scheduler, 1).len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(10, 0, 'a');
        scheduler.schedule(10, 0, 'b');

        assert!(scheduler.cancel(a));
        assert!(!scheduler.cancel(a));
        assert_eq!(drain(&mut scheduler, 10), vec!['b']);
    }

    #[test]
    fn test_cancel_where_generation() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(10, 1, 'a');
        scheduler.schedule(10, 2, 'b');
        scheduler.schedule(10, 1, 'c');

        assert_eq!(scheduler.cancel_where(|entry| entry.generation == 1), 2);
        assert_eq!(drain(&mut scheduler, 10), vec!['b']);
    }

    #[test]
    fn test_rescheduling_during_dispatch_is_relative_to_fire_time() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1000, 0, 0u32);

        // One big advance delivers every periodic tick inside it
        let target = 3500;
        let mut fired = Vec::new();
        while let Some(entry) = scheduler.pop_due(target) {
            fired.push((entry.task, scheduler.now_ms()));
            scheduler.schedule(1000, 0, entry.task + 1);
        }
        scheduler.settle(target);

        assert_eq!(fired, vec![(0, 1000), (1, 2000), (2, 3000)]);
        assert_eq!(scheduler.next_due(), Some(4000));
    }

    #[test]
    fn test_clear() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 0, ());
        scheduler.schedule(2, 0, ());
        scheduler.clear();
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.next_due(), None);
    }
}
