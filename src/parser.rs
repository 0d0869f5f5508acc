//! Consultation log parser
//!
//! The source system exports a line-oriented text format: segments
//! separated by a `---` line, each opening with a header line identifying
//! the querying user followed by one detail line per lookup. Parsing never
//! fails; malformed units degrade by omission (a bad header drops the whole
//! segment, a bad detail line drops only itself) and the worst outcome of
//! garbage input is an empty event list.

use crate::record::{LookupEvent, UNKNOWN_SENTINEL};
use crate::dates::Timestamp;
use regex::Regex;
use tracing::debug;

/// Parser for the consultation log format.
#[derive(Debug)]
pub struct RecordParser {
    header_re: Regex,
    detail_re: Regex,
}

impl RecordParser {
    pub fn new() -> Self {
        Self {
            header_re: Regex::new(
                r"Pkusuario: (\d+) - Legajo: (\d+) - DNI: (\d+) - Nombre: (.+)",
            )
            .expect("literal header pattern"),
            detail_re: Regex::new(r"DNI: (\d+) - Apellido: (.+) - Nombre: (.+) - Fecha: (.+)")
                .expect("literal detail pattern"),
        }
    }

    /// Parse a complete log document into events, newest first.
    ///
    /// An empty result means no segment matched; callers must treat that as
    /// "no data", not as a fault.
    pub fn parse(&self, text: &str) -> Vec<LookupEvent> {
        let mut events = Vec::new();
        let mut skipped_segments = 0usize;
        let mut skipped_lines = 0usize;

        for segment in split_segments(text) {
            match self.parse_segment(&segment) {
                Some((segment_events, dropped)) => {
                    events.extend(segment_events);
                    skipped_lines += dropped;
                }
                None => skipped_segments += 1,
            }
        }

        // Newest first; undated events sink to the end. sort_by is stable,
        // so equal timestamps keep parse order.
        events.sort_by(|a, b| b.timestamp.sort_key().cmp(&a.timestamp.sort_key()));

        debug!(
            events = events.len(),
            skipped_segments, skipped_lines, "parsed consultation log"
        );

        events
    }

    /// Parse one segment. Returns None when the header line does not match
    /// (the entire segment is discarded, detail lines included); otherwise
    /// the segment's events plus the count of detail lines dropped.
    fn parse_segment(&self, lines: &[&str]) -> Option<(Vec<LookupEvent>, usize)> {
        let (header, details) = lines.split_first()?;
        let caps = self.header_re.captures(header)?;

        let actor_id = caps[1].to_string();
        let actor_badge_number = caps[2].to_string();
        let actor_national_id = caps[3].to_string();
        let actor_name = caps[4].trim().to_string();

        let mut events = Vec::new();
        let mut dropped = 0usize;

        for line in details {
            let Some(caps) = self.detail_re.captures(line) else {
                if !line.trim().is_empty() {
                    dropped += 1;
                }
                continue;
            };

            let subject_national_id = caps[1].to_string();
            let subject_last_name = caps[2].trim().to_string();
            let subject_first_name = caps[3].trim().to_string();
            let is_unknown_subject =
                subject_last_name == UNKNOWN_SENTINEL || subject_first_name == UNKNOWN_SENTINEL;
            let is_self_lookup = actor_national_id == subject_national_id;

            events.push(LookupEvent {
                actor_id: actor_id.clone(),
                actor_badge_number: actor_badge_number.clone(),
                actor_national_id: actor_national_id.clone(),
                actor_name: actor_name.clone(),
                subject_national_id,
                subject_last_name,
                subject_first_name,
                timestamp: Timestamp::parse(&caps[4]),
                is_unknown_subject,
                is_self_lookup,
            });
        }

        Some((events, dropped))
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split the document into segments on `---` separator lines, dropping
/// leading blank lines inside each segment and blank segments entirely.
fn split_segments(text: &str) -> Vec<Vec<&str>> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim() == "---" {
            push_segment(&mut segments, &mut current);
        } else {
            current.push(line);
        }
    }
    push_segment(&mut segments, &mut current);

    segments
}

fn push_segment<'a>(segments: &mut Vec<Vec<&'a str>>, current: &mut Vec<&'a str>) {
    // First non-empty line is the header; anything before it is noise
    while current.first().is_some_and(|l| l.trim().is_empty()) {
        current.remove(0);
    }
    if !current.is_empty() {
        segments.push(std::mem::take(current));
    }
}

/// Convenience entry point for one-shot parsing.
pub fn parse_events(text: &str) -> Vec<LookupEvent> {
    RecordParser::new().parse(text)
}
