//! Per-user behavior aggregation
//!
//! Folds the parsed event sequence into one `UserProfile` per querying
//! user and ranks the result by suspicion score. The fold is
//! order-independent apart from first/last timestamps, which use
//! chronological extremes, and the final ordering, which breaks score ties
//! by first-encounter order.

use crate::dates::{update_extremes, Timestamp};
use crate::record::{LookupEvent, LookupKind};
use crate::score::suspicion_score;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Behavior profile of one querying user across the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub actor_id: String,
    pub actor_badge_number: String,
    pub actor_national_id: String,
    pub actor_name: String,
    pub total: u64,
    pub self_lookups: u64,
    pub other_lookups: u64,
    pub unknown_lookups: u64,
    /// Distinct third-party subjects, as `LastName FirstName (NationalId)`
    pub distinct_subjects: Vec<String>,
    pub first_seen: Timestamp,
    pub last_seen: Timestamp,
    /// Distinct calendar dates with at least one event
    pub active_days: u64,
    pub avg_per_active_day: f64,
    pub other_pct: f64,
    pub suspicion_score: u8,
}

/// Running accumulator for one user.
///
/// Invariant: an accumulator exists only once at least one event was
/// recorded, and every event contributes a per-day bucket, so
/// `active_days >= 1` always holds when materializing.
#[derive(Debug)]
struct UserAccumulator {
    actor_badge_number: String,
    actor_national_id: String,
    actor_name: String,
    total: u64,
    self_lookups: u64,
    other_lookups: u64,
    unknown_lookups: u64,
    distinct_subjects: BTreeSet<String>,
    first_seen: Timestamp,
    last_seen: Timestamp,
    events_per_day: HashMap<String, u64>,
}

impl UserAccumulator {
    fn new(event: &LookupEvent) -> Self {
        Self {
            actor_badge_number: event.actor_badge_number.clone(),
            actor_national_id: event.actor_national_id.clone(),
            actor_name: event.actor_name.clone(),
            total: 0,
            self_lookups: 0,
            other_lookups: 0,
            unknown_lookups: 0,
            distinct_subjects: BTreeSet::new(),
            first_seen: event.timestamp.clone(),
            last_seen: event.timestamp.clone(),
            events_per_day: HashMap::new(),
        }
    }

    fn record(&mut self, event: &LookupEvent) {
        self.total += 1;
        *self
            .events_per_day
            .entry(event.timestamp.date_part().to_string())
            .or_insert(0) += 1;

        update_extremes(&mut self.first_seen, &mut self.last_seen, &event.timestamp);

        match event.kind() {
            LookupKind::Unknown => self.unknown_lookups += 1,
            LookupKind::SelfLookup => self.self_lookups += 1,
            LookupKind::ThirdParty => {
                self.other_lookups += 1;
                self.distinct_subjects.insert(event.subject_label());
            }
        }
    }

    fn finish(self, actor_id: String) -> UserProfile {
        let active_days = self.events_per_day.len() as u64;
        let max_in_day = self.events_per_day.values().copied().max().unwrap_or(0);
        let other_pct = 100.0 * self.other_lookups as f64 / self.total as f64;
        let score = suspicion_score(
            other_pct,
            self.distinct_subjects.len(),
            max_in_day,
            self.unknown_lookups,
        );

        UserProfile {
            actor_id,
            actor_badge_number: self.actor_badge_number,
            actor_national_id: self.actor_national_id,
            actor_name: self.actor_name,
            total: self.total,
            self_lookups: self.self_lookups,
            other_lookups: self.other_lookups,
            unknown_lookups: self.unknown_lookups,
            distinct_subjects: self.distinct_subjects.into_iter().collect(),
            first_seen: self.first_seen,
            last_seen: self.last_seen,
            active_days,
            avg_per_active_day: self.total as f64 / active_days as f64,
            other_pct,
            suspicion_score: score,
        }
    }
}

/// Tracks per-user accumulators over one pass of the event sequence.
#[derive(Debug, Default)]
pub struct UserTracker {
    accumulators: HashMap<String, UserAccumulator>,
    /// First-encounter order of actor ids, for deterministic tie-breaks
    order: Vec<String>,
}

impl UserTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &LookupEvent) {
        let acc = self
            .accumulators
            .entry(event.actor_id.clone())
            .or_insert_with(|| {
                self.order.push(event.actor_id.clone());
                UserAccumulator::new(event)
            });
        acc.record(event);
    }

    /// Materialize profiles, sorted by suspicion score descending. The sort
    /// is stable; ties keep first-encounter order.
    pub fn finish(mut self) -> Vec<UserProfile> {
        let mut profiles: Vec<UserProfile> = self
            .order
            .into_iter()
            .filter_map(|id| {
                let acc = self.accumulators.remove(&id)?;
                Some(acc.finish(id))
            })
            .collect();

        profiles.sort_by(|a, b| b.suspicion_score.cmp(&a.suspicion_score));

        debug!(users = profiles.len(), "aggregated user profiles");
        profiles
    }
}

/// Fold a parsed event sequence into suspicion-ranked user profiles.
pub fn aggregate_users(events: &[LookupEvent]) -> Vec<UserProfile> {
    let mut tracker = UserTracker::new();
    for event in events {
        tracker.record(event);
    }
    tracker.finish()
}
