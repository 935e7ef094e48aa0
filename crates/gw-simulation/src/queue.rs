use std::collections::{BTreeMap, HashMap};

use crate::action::{Action, ActionId};

/// Time-ordered queue of scheduled actions.
///
/// Entries are keyed by `(trigger, seq)` where `seq` is a monotonic
/// insertion counter: among actions due on the same tick, the one scheduled
/// first runs first. That tie-break is part of the contract: equal-tick
/// sequencing must be reproducible, not an accident of container choice. A
/// side index by [`ActionId`] supports cancellation without scanning.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    entries: BTreeMap<(u64, u64), Action>,
    index: HashMap<ActionId, (u64, u64)>,
    next_seq: u64,
}

impl ActionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire at `trigger`.
    pub fn insert(&mut self, action: Action, trigger: u64) {
        let key = (trigger, self.next_seq);
        self.next_seq += 1;
        self.index.insert(action.id, key);
        self.entries.insert(key, action);
    }

    /// The earliest queued action and its trigger time, if any.
    pub fn peek_min(&self) -> Option<(&Action, u64)> {
        self.entries
            .first_key_value()
            .map(|(&(trigger, _), action)| (action, trigger))
    }

    /// Remove and return the earliest queued action regardless of time.
    pub fn pop_min(&mut self) -> Option<Action> {
        let (_key, action) = self.entries.pop_first()?;
        self.index.remove(&action.id);
        Some(action)
    }

    /// Remove and return the earliest queued action if its trigger time is
    /// strictly before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<Action> {
        let (&(trigger, _), _) = self.entries.first_key_value()?;
        if trigger < now { self.pop_min() } else { None }
    }

    /// Cancel a queued action by id. Returns `None` when the action is not
    /// queued; it may legitimately have run already.
    pub fn remove(&mut self, id: ActionId) -> Option<Action> {
        let key = self.index.remove(&id)?;
        self.entries.remove(&key)
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue holds no actions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use gw_core::entity::EntityId;
    use proptest::prelude::*;

    fn action(id: u64) -> Action {
        Action {
            id: ActionId(id),
            entity: EntityId(1),
            kind: ActionKind::Miner,
        }
    }

    #[test]
    fn pops_in_time_order_with_stable_ties() {
        let mut queue = ActionQueue::new();
        queue.insert(action(0), 5);
        queue.insert(action(1), 3);
        queue.insert(action(2), 3);
        queue.insert(action(3), 7);

        let order: Vec<u64> = std::iter::from_fn(|| queue.pop_due(10))
            .map(|a| a.id.0)
            .collect();
        assert_eq!(order, vec![1, 2, 0, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn peek_does_not_remove() {
        let mut queue = ActionQueue::new();
        queue.insert(action(0), 12);
        let (peeked, trigger) = queue.peek_min().unwrap();
        assert_eq!(peeked.id, ActionId(0));
        assert_eq!(trigger, 12);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn pop_due_is_strictly_before_now() {
        let mut queue = ActionQueue::new();
        queue.insert(action(0), 10);
        assert!(queue.pop_due(10).is_none());
        assert!(queue.pop_due(11).is_some());
    }

    #[test]
    fn remove_cancels_by_identity() {
        let mut queue = ActionQueue::new();
        queue.insert(action(0), 4);
        queue.insert(action(1), 4);

        assert!(queue.remove(ActionId(0)).is_some());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_min().unwrap().id, ActionId(1));
    }

    #[test]
    fn remove_absent_action_is_noop() {
        let mut queue = ActionQueue::new();
        queue.insert(action(0), 4);
        queue.pop_min();
        // Already ran; cancelling again must not disturb anything.
        assert!(queue.remove(ActionId(0)).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn insert_during_drain_lands_in_the_future() {
        let mut queue = ActionQueue::new();
        queue.insert(action(0), 2);
        let popped = queue.pop_due(5).unwrap();
        assert_eq!(popped.id, ActionId(0));
        // Reentrant insert while the popped action "runs".
        queue.insert(action(1), 7);
        assert!(queue.pop_due(5).is_none());
        assert_eq!(queue.len(), 1);
    }

    proptest! {
        #[test]
        fn drains_sorted_by_trigger_then_insertion(triggers in prop::collection::vec(0u64..50, 1..40)) {
            let mut queue = ActionQueue::new();
            for (i, &trigger) in triggers.iter().enumerate() {
                queue.insert(action(i as u64), trigger);
            }

            let mut drained: Vec<(u64, u64)> = Vec::new();
            while let Some(a) = queue.pop_min() {
                let trigger = triggers[a.id.0 as usize];
                drained.push((trigger, a.id.0));
            }
            prop_assert_eq!(drained.len(), triggers.len());
            // (trigger, insertion index) must come out non-decreasing.
            for pair in drained.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }
    }
}
