//! Speed-accumulation turn order
//!
//! Every pass adds each living creature's `wait` to its accumulator in
//! insertion order. The first creature to reach the threshold acts and starts
//! again from zero. Every request starts its passes at the first entry, so
//! entries after the actor miss the rest of the interrupted pass.

use serde::Serialize;

use crate::core::types::BeingId;

/// What the timeline needs to know about a creature on each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pace {
    pub wait: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub creature: BeingId,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    threshold: u32,
}

impl Timeline {
    pub fn new<I>(creatures: I, threshold: u32) -> Self
    where
        I: IntoIterator<Item = BeingId>,
    {
        Self {
            entries: creatures
                .into_iter()
                .map(|creature| TimelineEntry { creature, count: 0 })
                .collect(),
            threshold: threshold.max(1),
        }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, creature: BeingId) -> bool {
        self.entries.iter().any(|e| e.creature == creature)
    }

    /// Drop the entry of `creature`; other entries keep their accumulators
    pub fn remove(&mut self, creature: BeingId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.creature == creature) else {
            return false;
        };
        self.entries.remove(index);
        true
    }

    /// Run accumulation passes until some creature reaches the threshold
    ///
    /// Dead creatures, and creatures `pace` does not know, are skipped without
    /// accumulating. Returns None when no entry could ever act.
    pub fn next_actor<F>(&mut self, mut pace: F) -> Option<BeingId>
    where
        F: FnMut(BeingId) -> Option<Pace>,
    {
        let runnable = self
            .entries
            .iter()
            .any(|e| pace(e.creature).is_some_and(|p| p.alive && p.wait > 0));
        if !runnable {
            return None;
        }

        loop {
            for entry in &mut self.entries {
                let Some(Pace { wait, alive: true }) = pace(entry.creature) else {
                    continue;
                };

                entry.count = entry.count.saturating_add(wait);
                if entry.count >= self.threshold {
                    entry.count = 0;
                    return Some(entry.creature);
                }
            }
        }
    }
}
