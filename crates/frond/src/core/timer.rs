//! Deferred callbacks on a virtual clock.
//!
//! Everything that waits in the runtime is a timer: debounces, animation
//! completion, autoplay ticks, dismissal of notifications. The clock only
//! moves when the page is told to advance, so timing is deterministic.

use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

use slotmap::SlotMap;

use crate::{TimerId, WidgetId};

/// Who a timer belongs to, and what it means when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOwner {
    /// Delivered to a widget's `on_timer` with the given tag.
    Widget(WidgetId, &'static str),
    /// Handled by the page runtime itself.
    Page(PageTask),
}

/// Page-level deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTask {
    /// Debounced resize broadcast.
    ResizeFlush,
    /// Restore scroll behaviour after a scroll lock is released.
    ScrollBehaviorRestore,
    /// One frame of an animated window scroll.
    ScrollStep,
}

/// A scheduled entry in the heap.
#[derive(Debug)]
struct Pending {
    /// When the timer is due.
    deadline: Duration,
    /// Tie breaker preserving scheduling order.
    seq: u64,
    /// Timer handle.
    id: TimerId,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Pending {}

/// Reverse order so the earliest deadline is at the top.
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reverse order so the earliest deadline is at the top.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Timer bookkeeping for a page.
#[derive(Debug, Default)]
pub struct Timers {
    /// Current virtual time.
    now: Duration,
    /// Live timers and their owners. Cancelled timers are removed here and
    /// skipped when their heap entry surfaces.
    live: SlotMap<TimerId, TimerOwner>,
    /// Deadline heap.
    heap: BinaryHeap<Pending>,
    /// Scheduling counter.
    seq: u64,
}

impl Timers {
    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a timer `delay` from now.
    pub fn schedule(&mut self, owner: TimerOwner, delay: Duration) -> TimerId {
        let id = self.live.insert(owner);
        self.seq += 1;
        self.heap.push(Pending {
            deadline: self.now + delay,
            seq: self.seq,
            id,
        });
        id
    }

    /// Cancel a timer. Cancelling a fired or unknown timer is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(id).is_some()
    }

    /// Cancel every timer owned by a widget.
    pub fn cancel_widget(&mut self, widget: WidgetId) {
        self.live
            .retain(|_, owner| !matches!(owner, TimerOwner::Widget(w, _) if *w == widget));
    }

    /// Is the timer still pending?
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains_key(id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Are there no pending timers?
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Time until the next live timer is due.
    pub fn next_wait(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.heap
            .peek()
            .map(|p| p.deadline.saturating_sub(self.now))
    }

    /// Drop cancelled entries from the top of the heap.
    fn discard_cancelled(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.live.contains_key(top.id) {
                break;
            }
            self.heap.pop();
        }
    }

    /// Pop the next timer due at or before `until`, advancing the clock to its
    /// deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, TimerOwner)> {
        self.discard_cancelled();
        if self.heap.peek()?.deadline > until {
            return None;
        }
        let p = self.heap.pop()?;
        let owner = self.live.remove(p.id)?;
        self.now = self.now.max(p.deadline);
        Some((p.id, owner))
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn ordering_and_cancel() {
        let mut widgets: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let w = widgets.insert(());

        let mut t = Timers::default();
        assert_eq!(t.next_wait(), None);
        let a = t.schedule(TimerOwner::Widget(w, "a"), Duration::from_millis(100));
        let b = t.schedule(TimerOwner::Widget(w, "b"), Duration::from_millis(50));
        let c = t.schedule(TimerOwner::Widget(w, "c"), Duration::from_millis(50));
        assert_eq!(t.next_wait(), Some(Duration::from_millis(50)));
        assert!(t.cancel(b));
        assert!(!t.cancel(b));

        let until = Duration::from_millis(200);
        assert_eq!(t.pop_due(until), Some((c, TimerOwner::Widget(w, "c"))));
        assert_eq!(t.now(), Duration::from_millis(50));
        assert_eq!(t.pop_due(until), Some((a, TimerOwner::Widget(w, "a"))));
        assert_eq!(t.pop_due(until), None);
        assert!(t.is_empty());
    }

    #[test]
    fn not_yet_due() {
        let mut t = Timers::default();
        t.schedule(TimerOwner::Page(PageTask::ResizeFlush), Duration::from_millis(200));
        assert_eq!(t.pop_due(Duration::from_millis(199)), None);
        assert!(t.pop_due(Duration::from_millis(200)).is_some());
    }

    #[test]
    fn cancel_widget() {
        let mut widgets: SlotMap<WidgetId, ()> = SlotMap::with_key();
        let w1 = widgets.insert(());
        let w2 = widgets.insert(());
        let mut t = Timers::default();
        t.schedule(TimerOwner::Widget(w1, "x"), Duration::from_millis(1));
        let keep = t.schedule(TimerOwner::Widget(w2, "x"), Duration::from_millis(1));
        t.cancel_widget(w1);
        assert_eq!(t.len(), 1);
        assert!(t.is_pending(keep));
    }
}
