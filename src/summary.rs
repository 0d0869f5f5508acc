//! Dataset-level rollups
//!
//! Pure transformations over an already-built `AuditReport`, feeding the
//! overview panels a presentation layer would render: classification
//! totals, date coverage, weekday/hour activity breakdowns, and counts of
//! high-risk entries. Recomputable on demand, no state of their own.

use crate::record::{LookupEvent, LookupKind};
use crate::report::AuditReport;
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Score at or above which the original dashboard flagged an entry.
pub const HIGH_RISK_THRESHOLD: u8 = 70;

/// Localized weekday names, Monday first.
const WEEKDAY_NAMES: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

/// Event counts split by classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub total: u64,
    pub self_lookups: u64,
    pub other_lookups: u64,
    pub unknown_lookups: u64,
}

impl KindCounts {
    fn record(&mut self, event: &LookupEvent) {
        self.total += 1;
        match event.kind() {
            LookupKind::SelfLookup => self.self_lookups += 1,
            LookupKind::ThirdParty => self.other_lookups += 1,
            LookupKind::Unknown => self.unknown_lookups += 1,
        }
    }
}

/// Activity bucket for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayActivity {
    pub name: String,
    pub counts: KindCounts,
}

/// Activity bucket for one hour of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourActivity {
    pub hour: u32,
    pub counts: KindCounts,
}

/// Event count for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: String,
    pub count: u64,
}

/// Overview of one audit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub counts: KindCounts,
    pub distinct_actors: u64,
    pub distinct_known_subjects: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date: Option<String>,
    /// Per-date event counts, date ascending (dated events only)
    pub events_per_date: Vec<DailyActivity>,
    /// Seven buckets, Monday first (dated events only)
    pub by_weekday: Vec<WeekdayActivity>,
    /// Twenty-four buckets (dated events only)
    pub by_hour: Vec<HourActivity>,
    /// Users with suspicion score >= 70
    pub high_risk_users: u64,
    /// Subjects with exposure score >= 70
    pub high_exposure_subjects: u64,
}

impl DatasetSummary {
    pub fn from_report(report: &AuditReport) -> Self {
        let mut counts = KindCounts::default();
        let mut actors = BTreeSet::new();
        let mut known_subjects = BTreeSet::new();
        let mut per_date: BTreeMap<String, u64> = BTreeMap::new();
        let mut weekday_counts = [KindCounts::default(); 7];
        let mut hour_counts = [KindCounts::default(); 24];

        for event in &report.events {
            counts.record(event);
            actors.insert(event.actor_id.as_str());
            if !event.is_unknown_subject {
                known_subjects.insert(event.subject_national_id.as_str());
            }

            // Events without a real calendar position stay out of the
            // date/weekday/hour buckets but still count above
            let Some(dt) = event.timestamp.datetime() else {
                continue;
            };
            *per_date
                .entry(event.timestamp.date_part().to_string())
                .or_insert(0) += 1;
            let weekday = dt.weekday().num_days_from_monday() as usize;
            weekday_counts[weekday].record(event);
            hour_counts[dt.hour() as usize].record(event);
        }

        let by_weekday = WEEKDAY_NAMES
            .iter()
            .zip(weekday_counts)
            .map(|(name, counts)| WeekdayActivity {
                name: (*name).to_string(),
                counts,
            })
            .collect();
        let by_hour = hour_counts
            .into_iter()
            .enumerate()
            .map(|(hour, counts)| HourActivity {
                hour: hour as u32,
                counts,
            })
            .collect();

        Self {
            counts,
            distinct_actors: actors.len() as u64,
            distinct_known_subjects: known_subjects.len() as u64,
            first_date: per_date.keys().next().cloned(),
            last_date: per_date.keys().next_back().cloned(),
            events_per_date: per_date
                .into_iter()
                .map(|(date, count)| DailyActivity { date, count })
                .collect(),
            by_weekday,
            by_hour,
            high_risk_users: count_at_threshold(report.users.iter().map(|u| u.suspicion_score)),
            high_exposure_subjects: count_at_threshold(
                report.subjects.iter().map(|s| s.exposure_score),
            ),
        }
    }
}

fn count_at_threshold(scores: impl Iterator<Item = u8>) -> u64 {
    scores.filter(|&s| s >= HIGH_RISK_THRESHOLD).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Pkusuario: 1 - Legajo: 100 - DNI: 111 - Nombre: Ana\n\
        DNI: 111 - Apellido: Gomez - Nombre: Ana - Fecha: 01/02/2024 10:00:00\n\
        DNI: 222 - Apellido: Perez - Nombre: Luis - Fecha: 02/02/2024 11:30:00\n\
        DNI: 999 - Apellido: Desconocido - Nombre: Desconocido - Fecha: 02/02/2024 23:10:00\n\
        ---";

    fn summary() -> DatasetSummary {
        DatasetSummary::from_report(&AuditReport::from_text(SAMPLE))
    }

    #[test]
    fn test_classification_totals() {
        let s = summary();
        assert_eq!(s.counts.total, 3);
        assert_eq!(s.counts.self_lookups, 1);
        assert_eq!(s.counts.other_lookups, 1);
        assert_eq!(s.counts.unknown_lookups, 1);
    }

    #[test]
    fn test_distinct_cardinalities() {
        let s = summary();
        assert_eq!(s.distinct_actors, 1);
        // The unknown 999 record must not count as a known subject
        assert_eq!(s.distinct_known_subjects, 2);
    }

    #[test]
    fn test_date_range_and_daily_counts() {
        let s = summary();
        assert_eq!(s.first_date.as_deref(), Some("2024-02-01"));
        assert_eq!(s.last_date.as_deref(), Some("2024-02-02"));
        assert_eq!(s.events_per_date.len(), 2);
        assert_eq!(s.events_per_date[0].date, "2024-02-01");
        assert_eq!(s.events_per_date[0].count, 1);
        assert_eq!(s.events_per_date[1].count, 2);
    }

    #[test]
    fn test_weekday_buckets() {
        // 2024-02-01 is a Thursday, 2024-02-02 a Friday
        let s = summary();
        let thursday = &s.by_weekday[3];
        assert_eq!(thursday.name, "Jueves");
        assert_eq!(thursday.counts.total, 1);
        let friday = &s.by_weekday[4];
        assert_eq!(friday.counts.total, 2);
    }

    #[test]
    fn test_hour_buckets() {
        let s = summary();
        assert_eq!(s.by_hour.len(), 24);
        assert_eq!(s.by_hour[10].counts.total, 1);
        assert_eq!(s.by_hour[11].counts.total, 1);
        assert_eq!(s.by_hour[23].counts.unknown_lookups, 1);
        assert_eq!(s.by_hour[0].counts.total, 0);
    }

    #[test]
    fn test_undated_events_counted_but_not_bucketed() {
        let text = "Pkusuario: 1 - Legajo: 100 - DNI: 111 - Nombre: Ana\n\
            DNI: 222 - Apellido: Perez - Nombre: Luis - Fecha: bogus\n\
            ---";
        let s = DatasetSummary::from_report(&AuditReport::from_text(text));
        assert_eq!(s.counts.total, 1);
        assert!(s.events_per_date.is_empty());
        assert_eq!(s.first_date, None);
        let bucketed: u64 = s.by_weekday.iter().map(|w| w.counts.total).sum();
        assert_eq!(bucketed, 0);
    }

    #[test]
    fn test_high_risk_counters() {
        // Quiet dataset: nobody crosses the threshold
        let s = summary();
        assert_eq!(s.high_risk_users, 0);
        assert_eq!(s.high_exposure_subjects, 0);
    }

    #[test]
    fn test_empty_report_summary() {
        let s = DatasetSummary::from_report(&AuditReport::from_text(""));
        assert_eq!(s.counts.total, 0);
        assert_eq!(s.distinct_actors, 0);
        assert!(s.events_per_date.is_empty());
    }
}
