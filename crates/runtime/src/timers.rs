//! Virtual-clock timer table.
//!
//! All timekeeping runs against an explicit millisecond clock handed in by
//! the caller, so tests never touch the wall clock. Ordering contract:
//! timers fire by (deadline, id), deterministic under any insertion order.

use std::collections::BTreeMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Entry {
    deadline: u64,
    /// Repeat interval; `None` is a one-shot.
    interval: Option<u64>,
}

/// Named timers keyed by a static id, the way render passes refer to them.
#[derive(Debug, Default)]
pub struct Timers {
    entries: BTreeMap<&'static str, Entry>,
}

impl Timers {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Arm (or re-arm) a one-shot. Re-scheduling an already armed id moves
    /// its deadline, so bursts of calls coalesce into one firing `delay_ms`
    /// after the last call.
    pub fn schedule_once(&mut self, id: &'static str, delay_ms: u64, now_ms: u64) {
        self.entries.insert(
            id,
            Entry {
                deadline: now_ms + delay_ms,
                interval: None,
            },
        );
    }

    /// Arm a repeating timer. An already armed id keeps its current phase.
    pub fn schedule_repeating(&mut self, id: &'static str, interval_ms: u64, now_ms: u64) {
        self.entries.entry(id).or_insert(Entry {
            deadline: now_ms + interval_ms,
            interval: Some(interval_ms),
        });
    }

    pub fn cancel(&mut self, id: &'static str) {
        self.entries.remove(id);
    }

    pub fn is_armed(&self, id: &'static str) -> bool {
        self.entries.contains_key(id)
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.values().map(|e| e.deadline).min()
    }

    /// Collect every timer due at `now_ms`. Each due id fires at most once
    /// per call; repeating timers re-arm relative to `now_ms`, one-shots
    /// are removed.
    pub fn fire_due(&mut self, now_ms: u64) -> Vec<&'static str> {
        let mut due: Vec<(u64, &'static str)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.deadline <= now_ms)
            .map(|(id, e)| (e.deadline, *id))
            .collect();
        due.sort();

        let mut fired = Vec::with_capacity(due.len());
        for (_, id) in due {
            let entry = match self.entries.get_mut(id) {
                Some(entry) => entry,
                None => continue,
            };
            match entry.interval {
                Some(interval) => entry.deadline = now_ms + interval,
                None => {
                    self.entries.remove(id);
                }
            }
            fired.push(id);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::Timers;

    #[test]
    fn one_shot_fires_once() {
        let mut timers = Timers::new();
        timers.schedule_once("hit", 500, 0);
        assert_eq!(timers.fire_due(499), Vec::<&str>::new());
        assert_eq!(timers.fire_due(500), vec!["hit"]);
        assert!(!timers.is_armed("hit"));
        assert_eq!(timers.fire_due(1000), Vec::<&str>::new());
    }

    #[test]
    fn rescheduling_coalesces_to_the_last_call() {
        let mut timers = Timers::new();
        timers.schedule_once("hit", 500, 0);
        timers.schedule_once("hit", 500, 200);
        timers.schedule_once("hit", 500, 400);
        assert_eq!(timers.fire_due(899), Vec::<&str>::new());
        assert_eq!(timers.fire_due(900), vec!["hit"]);
    }

    #[test]
    fn repeating_keeps_firing_until_cancelled() {
        let mut timers = Timers::new();
        timers.schedule_repeating("fade", 33, 0);
        // arming again must not reset the phase
        timers.schedule_repeating("fade", 33, 10);
        assert_eq!(timers.fire_due(33), vec!["fade"]);
        assert_eq!(timers.fire_due(66), vec!["fade"]);
        timers.cancel("fade");
        assert_eq!(timers.fire_due(99), Vec::<&str>::new());
    }

    #[test]
    fn fires_in_deadline_then_id_order() {
        let mut timers = Timers::new();
        timers.schedule_once("b", 10, 0);
        timers.schedule_once("a", 10, 0);
        timers.schedule_once("c", 5, 0);
        assert_eq!(timers.fire_due(10), vec!["c", "a", "b"]);
    }

    #[test]
    fn next_deadline_tracks_the_earliest_entry() {
        let mut timers = Timers::new();
        assert_eq!(timers.next_deadline(), None);
        timers.schedule_once("a", 40, 0);
        timers.schedule_repeating("fade", 33, 0);
        assert_eq!(timers.next_deadline(), Some(33));
    }
}
