use slab::Slab;

/// Handle returned by `set_timeout`, usable with `clear_timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub(crate) usize);

struct TimerEntry {
    deadline: f64,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

/// Deadline-ordered one-shot callbacks.
///
/// Entries fire in `(deadline, registration order)`, never early. The loop
/// also reuses this structure for the input-task class, where `deadline` is
/// the timestamp the input event arrives at.
#[derive(Default)]
pub(crate) struct TimerQueue {
    entries: Slab<TimerEntry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn insert(&mut self, deadline: f64, callback: Box<dyn FnOnce()>) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        TimerId(self.entries.insert(TimerEntry {
            deadline,
            seq,
            callback,
        }))
    }

    pub fn remove(&mut self, id: TimerId) -> bool {
        self.entries.try_remove(id.0).is_some()
    }

    /// Takes the earliest entry whose deadline has passed, ties broken by
    /// registration order. Small populations, so a linear scan beats keeping
    /// a heap coherent with cancellation.
    pub fn pop_due(&mut self, now: f64) -> Option<Box<dyn FnOnce()>> {
        let key = self
            .entries
            .iter()
            .filter(|(_, e)| e.deadline <= now)
            .min_by(|(_, a), (_, b)| {
                a.deadline
                    .total_cmp(&b.deadline)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(key, _)| key)?;
        Some(self.entries.remove(key).callback)
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|(_, e)| e.deadline)
            .min_by(f64::total_cmp)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn pops_in_deadline_then_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = TimerQueue::default();
        for (deadline, label) in [(20.0, "b"), (10.0, "a"), (20.0, "c")] {
            let log = log.clone();
            queue.insert(deadline, Box::new(move || log.borrow_mut().push(label)));
        }

        while let Some(cb) = queue.pop_due(100.0) {
            cb();
        }
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn never_pops_early() {
        let mut queue = TimerQueue::default();
        queue.insert(50.0, Box::new(|| {}));
        assert!(queue.pop_due(49.9).is_none());
        assert!(queue.pop_due(50.0).is_some());
    }

    #[test]
    fn removed_entries_do_not_fire() {
        let mut queue = TimerQueue::default();
        let id = queue.insert(0.0, Box::new(|| panic!("cancelled timer fired")));
        assert!(queue.remove(id));
        assert!(!queue.remove(id));
        assert!(queue.pop_due(10.0).is_none());
    }
}
