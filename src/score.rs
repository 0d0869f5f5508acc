//! Heuristic risk scoring
//!
//! Two independent bounded formulas: one ranking querying users by
//! likelihood of improper access, one ranking looked-up identities by how
//! widely their record has been viewed. Both blend a percentage signal
//! with capped cardinality and volume terms so no single component can
//! saturate the score; results are integers in [0, 100].

/// Suspicion score for a querying user.
///
/// Components: breadth of third-party access (percentage / 10), diversity
/// of targets (2 per distinct subject, capped at 20), single-day burstiness
/// (+10 above 10 events, +5 above 5), and unresolved-lookup volume (0.5 per
/// unknown).
pub fn suspicion_score(
    other_pct: f64,
    distinct_subjects: usize,
    max_events_in_day: u64,
    unknown_count: u64,
) -> u8 {
    let mut score = other_pct / 10.0;
    score += (distinct_subjects as f64 * 2.0).min(20.0);
    score += if max_events_in_day > 10 {
        10.0
    } else if max_events_in_day > 5 {
        5.0
    } else {
        0.0
    };
    score += unknown_count as f64 * 0.5;

    clamp_rounded(score)
}

/// Exposure score for a looked-up identity.
///
/// Weighs distinct viewers much more heavily (5 per actor, capped at 50)
/// than the user-side score weighs target diversity: exposure risk scales
/// faster with distinct viewers than with raw volume.
pub fn exposure_score(other_access_pct: f64, distinct_actors: usize, total_accesses: u64) -> u8 {
    let mut score = other_access_pct / 10.0;
    score += (distinct_actors as f64 * 5.0).min(50.0);
    score += if total_accesses > 10 {
        15.0
    } else if total_accesses > 5 {
        10.0
    } else if total_accesses > 2 {
        5.0
    } else {
        0.0
    };

    clamp_rounded(score)
}

fn clamp_rounded(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}
