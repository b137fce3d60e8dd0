//! Logical-clock timer queue

use std::collections::{BTreeMap, HashMap};

/// Handle returned by [`Scheduler::schedule`], used to cancel a timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Timer queue keyed by due time on a logical millisecond clock
///
/// Events due at the same instant fire in scheduling order.
#[derive(Debug)]
pub struct Scheduler<E> {
    /// Current logical time
    now_ms: u64,
    /// Sequence number of the next timer
    next_seq: u64,
    /// Pending events ordered by (due, seq)
    queue: BTreeMap<(u64, u64), E>,
    /// Due time by sequence number, for cancellation
    due_by_seq: HashMap<u64, u64>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    /// Create a scheduler at time zero
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            due_by_seq: HashMap::new(),
        }
    }

    /// Current logical time
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of pending timers
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Schedule `event` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, event: E) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, seq), event);
        self.due_by_seq.insert(seq, due);
        TimerHandle(seq)
    }

    /// Cancel a pending timer; `false` if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_by_seq.remove(&handle.0) {
            Some(due) => self.queue.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    /// Cancel every pending timer, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        self.due_by_seq.clear();
        dropped
    }

    /// Remove the earliest timer due at or before `until_ms`
    ///
    /// The clock jumps to the timer's due time so events scheduled from its
    /// handler are relative to when it fired.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerHandle, E)> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > until_ms {
            return None;
        }
        let event = self.queue.remove(&(due, seq))?;
        self.due_by_seq.remove(&seq);
        self.now_ms = self.now_ms.max(due);
        Some((TimerHandle(seq), event))
    }

    /// Move the clock forward to `t`; never moves backwards
    pub fn set_now(&mut self, t: u64) {
        self.now_ms = self.now_ms.max(t);
    }
}
