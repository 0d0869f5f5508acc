//! Per-subject exposure aggregation
//!
//! Folds known-subject events into one `SubjectProfile` per looked-up
//! national ID and ranks the result by exposure score. Unknown-subject
//! events contribute to no profile at all; they are outside this
//! aggregate's keyspace.

use crate::dates::{update_extremes, Timestamp};
use crate::record::LookupEvent;
use crate::score::exposure_score;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Exposure profile of one looked-up identity across the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub national_id: String,
    pub last_name: String,
    pub first_name: String,
    pub total_accesses: u64,
    pub self_accesses: u64,
    pub other_accesses: u64,
    /// Distinct third-party viewers, as `Name (NationalId)`
    pub distinct_actors: Vec<String>,
    pub first_access: Timestamp,
    pub last_access: Timestamp,
    pub other_access_pct: f64,
    pub exposure_score: u8,
}

#[derive(Debug)]
struct SubjectAccumulator {
    /// Display name taken from the first event seen for this national ID
    last_name: String,
    first_name: String,
    total_accesses: u64,
    self_accesses: u64,
    other_accesses: u64,
    distinct_actors: BTreeSet<String>,
    first_access: Timestamp,
    last_access: Timestamp,
}

impl SubjectAccumulator {
    fn new(event: &LookupEvent) -> Self {
        Self {
            last_name: event.subject_last_name.clone(),
            first_name: event.subject_first_name.clone(),
            total_accesses: 0,
            self_accesses: 0,
            other_accesses: 0,
            distinct_actors: BTreeSet::new(),
            first_access: event.timestamp.clone(),
            last_access: event.timestamp.clone(),
        }
    }

    fn record(&mut self, event: &LookupEvent) {
        self.total_accesses += 1;
        update_extremes(&mut self.first_access, &mut self.last_access, &event.timestamp);

        if event.is_self_lookup {
            self.self_accesses += 1;
        } else {
            self.other_accesses += 1;
            self.distinct_actors.insert(event.actor_label());
        }
    }

    fn finish(self, national_id: String) -> SubjectProfile {
        let other_access_pct = 100.0 * self.other_accesses as f64 / self.total_accesses as f64;
        let score = exposure_score(
            other_access_pct,
            self.distinct_actors.len(),
            self.total_accesses,
        );

        SubjectProfile {
            national_id,
            last_name: self.last_name,
            first_name: self.first_name,
            total_accesses: self.total_accesses,
            self_accesses: self.self_accesses,
            other_accesses: self.other_accesses,
            distinct_actors: self.distinct_actors.into_iter().collect(),
            first_access: self.first_access,
            last_access: self.last_access,
            other_access_pct,
            exposure_score: score,
        }
    }
}

/// Tracks per-subject accumulators over one pass of the event sequence.
#[derive(Debug, Default)]
pub struct SubjectTracker {
    accumulators: HashMap<String, SubjectAccumulator>,
    order: Vec<String>,
}

impl SubjectTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event. Unknown-subject events are ignored entirely.
    pub fn record(&mut self, event: &LookupEvent) {
        if event.is_unknown_subject {
            return;
        }
        let acc = self
            .accumulators
            .entry(event.subject_national_id.clone())
            .or_insert_with(|| {
                self.order.push(event.subject_national_id.clone());
                SubjectAccumulator::new(event)
            });
        acc.record(event);
    }

    /// Materialize profiles, sorted by exposure score descending. Stable;
    /// ties keep first-encounter order.
    pub fn finish(mut self) -> Vec<SubjectProfile> {
        let mut profiles: Vec<SubjectProfile> = self
            .order
            .into_iter()
            .filter_map(|id| {
                let acc = self.accumulators.remove(&id)?;
                Some(acc.finish(id))
            })
            .collect();

        profiles.sort_by(|a, b| b.exposure_score.cmp(&a.exposure_score));

        debug!(subjects = profiles.len(), "aggregated subject profiles");
        profiles
    }
}

/// Fold a parsed event sequence into exposure-ranked subject profiles.
pub fn aggregate_subjects(events: &[LookupEvent]) -> Vec<SubjectProfile> {
    let mut tracker = SubjectTracker::new();
    for event in events {
        tracker.record(event);
    }
    tracker.finish()
}
