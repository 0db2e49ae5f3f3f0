//! Priority-indexed ready queue.
//!
//! A bitmap of non-empty priority levels gives O(1) "is anything ready,
//! and at what priority" queries, and a small FIFO ring per level
//! preserves activation order within a priority.
//!
//! This targets the OSEK priority ranges actually seen on deeply embedded
//! ECUs and caps `PRIOS` at 64 so a single `u64` word bitmap suffices —
//! see `DESIGN.md` for why a multi-level bitmap wasn't worth the extra
//! complexity here.

use sdvos_core::TaskId;

/// A fixed-capacity FIFO ring of ready task occurrences at one priority
/// level. A task occupies at most one slot at a time (it is READY,
/// RUNNING, WAITING or SUSPENDED, never more than one of those); queued
/// re-activations of a still-running basic task are tracked separately as
/// a per-task counter and only gain a slot once the running instance
/// terminates.
#[derive(Clone, Copy)]
struct Level<const SLOTS: usize> {
    slots: [Option<TaskId>; SLOTS],
    len: usize,
}

impl<const SLOTS: usize> Level<SLOTS> {
    const fn new() -> Self {
        Self {
            slots: [None; SLOTS],
            len: 0,
        }
    }

    fn push(&mut self, task: TaskId) {
        assert!(self.len < SLOTS, "ready queue level capacity exceeded");
        self.slots[self.len] = Some(task);
        self.len += 1;
    }

    fn remove_at(&mut self, pos: usize) {
        for i in pos..self.len - 1 {
            self.slots[i] = self.slots[i + 1];
        }
        self.slots[self.len - 1] = None;
        self.len -= 1;
    }

    fn find(&self, task: TaskId) -> Option<usize> {
        self.slots[..self.len].iter().position(|s| *s == Some(task))
    }

    fn first(&self) -> Option<TaskId> {
        self.slots[0]
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The scheduler's ready set, indexed by priority.
///
/// `PRIOS` is the number of distinct priority levels (must be `<= 64`).
/// `SLOTS` bounds how many ready occurrences a single priority level can
/// hold simultaneously — the sum, over every task at that priority, of its
/// `max_activations`.
pub struct ReadyQueue<const PRIOS: usize, const SLOTS: usize> {
    bitmap: u64,
    levels: [Level<SLOTS>; PRIOS],
}

impl<const PRIOS: usize, const SLOTS: usize> ReadyQueue<PRIOS, SLOTS> {
    pub const fn new() -> Self {
        assert!(PRIOS <= 64, "ReadyQueue supports at most 64 priority levels");
        Self {
            bitmap: 0,
            levels: [Level::new(); PRIOS],
        }
    }

    /// Insert one ready occurrence of `task` at `priority`.
    ///
    /// Panics (kernel invariant violation, not a user error — the
    /// configuration generator is responsible for sizing `SLOTS`) if the
    /// level is already full.
    pub fn insert(&mut self, priority: u8, task: TaskId) {
        self.levels[priority as usize].push(task);
        self.bitmap |= 1 << priority;
    }

    /// Remove one occurrence of `task` at `priority`, if present.
    pub fn remove_one(&mut self, priority: u8, task: TaskId) -> bool {
        let level = &mut self.levels[priority as usize];
        if let Some(pos) = level.find(task) {
            level.remove_at(pos);
            if level.is_empty() {
                self.bitmap &= !(1 << priority);
            }
            true
        } else {
            false
        }
    }

    /// The priority and task at the head of the highest-priority
    /// non-empty level, without removing it.
    pub fn peek_highest(&self) -> Option<(u8, TaskId)> {
        if self.bitmap == 0 {
            return None;
        }
        let priority = (63 - self.bitmap.leading_zeros()) as u8;
        self.levels[priority as usize].first().map(|t| (priority, t))
    }

    /// Pop the task at the head of the highest-priority non-empty level.
    pub fn pop_highest(&mut self) -> Option<(u8, TaskId)> {
        let (priority, task) = self.peek_highest()?;
        let level = &mut self.levels[priority as usize];
        level.remove_at(0);
        if level.is_empty() {
            self.bitmap &= !(1 << priority);
        }
        Some((priority, task))
    }

    /// `true` if nothing is ready at or above `priority`.
    pub fn is_empty_at_or_above(&self, priority: u8) -> bool {
        let mask = !0u64 << priority;
        self.bitmap & mask == 0
    }
}

impl<const PRIOS: usize, const SLOTS: usize> Default for ReadyQueue<PRIOS, SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_within_level() {
        let mut q: ReadyQueue<8, 4> = ReadyQueue::new();
        q.insert(3, TaskId::new(0));
        q.insert(3, TaskId::new(1));
        assert_eq!(q.pop_highest(), Some((3, TaskId::new(0))));
        assert_eq!(q.pop_highest(), Some((3, TaskId::new(1))));
        assert_eq!(q.pop_highest(), None);
    }

    #[test]
    fn highest_priority_wins() {
        let mut q: ReadyQueue<8, 4> = ReadyQueue::new();
        q.insert(1, TaskId::new(0));
        q.insert(5, TaskId::new(1));
        q.insert(3, TaskId::new(2));
        assert_eq!(q.pop_highest(), Some((5, TaskId::new(1))));
        assert_eq!(q.pop_highest(), Some((3, TaskId::new(2))));
        assert_eq!(q.pop_highest(), Some((1, TaskId::new(0))));
    }

    #[test]
    fn remove_specific_occurrence() {
        let mut q: ReadyQueue<8, 4> = ReadyQueue::new();
        q.insert(2, TaskId::new(0));
        q.insert(2, TaskId::new(1));
        assert!(q.remove_one(2, TaskId::new(0)));
        assert_eq!(q.pop_highest(), Some((2, TaskId::new(1))));
        assert!(!q.remove_one(2, TaskId::new(5)));
    }

    #[quickcheck_macros::quickcheck]
    fn empty_at_or_above_matches_bitmap(priorities: Vec<u8>) -> bool {
        let mut q: ReadyQueue<64, 4> = ReadyQueue::new();
        for (i, &p) in priorities.iter().enumerate().take(4) {
            q.insert(p % 64, TaskId::new(i));
        }
        (0..64u8).all(|p| q.is_empty_at_or_above(p) == (q.bitmap & (!0u64 << p) == 0))
    }
}
