//! Best-effort timestamp normalization for consultation dates
//!
//! Source dates arrive as `DD/MM/YYYY HH:MM:SS` with the time portion
//! optional. They are normalized into a sortable `YYYY-MM-DD HH:MM:SS`
//! string plus a numeric epoch for chronological comparisons. Normalization
//! never fails: input that does not match the expected shape is carried
//! through unchanged and simply has no epoch.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A parsed consultation timestamp.
///
/// `normalized` is the sortable form when the input matched the
/// `DD/MM/YYYY` shape, otherwise the raw input verbatim. `epoch` is
/// present only when the normalized form is a real calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub normalized: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<i64>,
}

impl Timestamp {
    /// Parse a raw `DD/MM/YYYY [HH:MM:SS]` string, normalizing best-effort.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let mut parts = raw.splitn(2, ' ');
        let date = parts.next().unwrap_or("");
        let time = parts.next().map(str::trim).filter(|t| !t.is_empty());

        let fields: Vec<&str> = date.split('/').collect();
        let normalized = if fields.len() == 3 {
            format!(
                "{}-{:0>2}-{:0>2} {}",
                fields[2],
                fields[1],
                fields[0],
                time.unwrap_or("00:00:00")
            )
        } else {
            raw.to_string()
        };

        let epoch = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|dt| dt.and_utc().timestamp());

        Self { normalized, epoch }
    }

    /// Display form `DD/MM/YYYY HH:MM:SS`; unparsed values pass through.
    pub fn display(&self) -> String {
        let mut parts = self.normalized.splitn(2, ' ');
        let date = parts.next().unwrap_or("");
        let time = parts.next().unwrap_or("");

        let fields: Vec<&str> = date.split('-').collect();
        if fields.len() == 3 {
            format!("{}/{}/{} {}", fields[2], fields[1], fields[0], time)
        } else {
            self.normalized.clone()
        }
    }

    /// Calendar date portion (`YYYY-MM-DD`), used as the per-day bucket key.
    pub fn date_part(&self) -> &str {
        self.normalized
            .split_once(' ')
            .map_or(self.normalized.as_str(), |(d, _)| d)
    }

    /// Full calendar date-time, when the timestamp normalized successfully.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.normalized, "%Y-%m-%d %H:%M:%S").ok()
    }

    /// Hour of day in 0..24, when the timestamp normalized successfully.
    pub fn hour(&self) -> Option<u32> {
        self.datetime().map(|dt| dt.hour())
    }

    /// Sort key for newest-first ordering; undated values sink to the end.
    pub fn sort_key(&self) -> i64 {
        self.epoch.unwrap_or(i64::MIN)
    }
}

/// Replace the chronological extremes when the candidate has an epoch and
/// beats the current holder (or the holder has none). Undated candidates
/// never displace a dated extreme.
pub(crate) fn update_extremes(first: &mut Timestamp, last: &mut Timestamp, candidate: &Timestamp) {
    if let Some(epoch) = candidate.epoch {
        if first.epoch.is_none_or(|cur| epoch < cur) {
            *first = candidate.clone();
        }
        if last.epoch.is_none_or(|cur| epoch > cur) {
            *last = candidate.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_datetime() {
        let ts = Timestamp::parse("05/03/2024 14:30:15");
        assert_eq!(ts.normalized, "2024-03-05 14:30:15");
        assert!(ts.epoch.is_some());
    }

    #[test]
    fn test_parse_date_only_defaults_midnight() {
        let ts = Timestamp::parse("05/03/2024");
        assert_eq!(ts.normalized, "2024-03-05 00:00:00");
        assert!(ts.epoch.is_some());
    }

    #[test]
    fn test_parse_pads_single_digit_fields() {
        let ts = Timestamp::parse("1/2/2024 10:00:00");
        assert_eq!(ts.normalized, "2024-02-01 10:00:00");
    }

    #[test]
    fn test_parse_malformed_passes_through() {
        let ts = Timestamp::parse("not a date");
        assert_eq!(ts.normalized, "not a date");
        assert_eq!(ts.epoch, None);
    }

    #[test]
    fn test_parse_invalid_calendar_date_has_no_epoch() {
        // Shape matches, but February 31st does not exist
        let ts = Timestamp::parse("31/02/2024 10:00:00");
        assert_eq!(ts.normalized, "2024-02-31 10:00:00");
        assert_eq!(ts.epoch, None);
    }

    #[test]
    fn test_display_round_trip() {
        let ts = Timestamp::parse("07/11/2023 09:05:00");
        assert_eq!(ts.display(), "07/11/2023 09:05:00");
        let back = Timestamp::parse(&ts.display());
        assert_eq!(back.normalized, ts.normalized);
        assert_eq!(back.epoch, ts.epoch);
    }

    #[test]
    fn test_display_malformed_passes_through() {
        let ts = Timestamp::parse("garbage");
        assert_eq!(ts.display(), "garbage");
    }

    #[test]
    fn test_date_part() {
        let ts = Timestamp::parse("15/06/2024 23:59:59");
        assert_eq!(ts.date_part(), "2024-06-15");
    }

    #[test]
    fn test_hour_extraction() {
        let ts = Timestamp::parse("15/06/2024 23:59:59");
        assert_eq!(ts.hour(), Some(23));
        assert_eq!(Timestamp::parse("junk").hour(), None);
    }

    #[test]
    fn test_sort_key_orders_chronologically() {
        let earlier = Timestamp::parse("01/01/2024 00:00:00");
        let later = Timestamp::parse("02/01/2024 00:00:00");
        assert!(later.sort_key() > earlier.sort_key());
    }

    #[test]
    fn test_sort_key_undated_sinks() {
        let dated = Timestamp::parse("01/01/1970 00:00:00");
        let undated = Timestamp::parse("mystery");
        assert!(undated.sort_key() < dated.sort_key());
    }
}
