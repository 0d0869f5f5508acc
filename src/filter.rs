//! Event filtering for presentation consumers
//!
//! Supports expressions like:
//! - `kind=self,other` — classification classes
//! - `actor=111,222` — by actor national ID
//! - `subject=333` — by subject national ID
//!
//! Clauses separated by whitespace AND together; values within a clause OR
//! together. Filtering is a pure predicate over an already-built report.

use crate::record::{LookupEvent, LookupKind};
use std::collections::HashSet;
use thiserror::Error;

/// Errors for filter expression parsing
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("empty filter expression")]
    Empty,

    #[error("unknown filter key: {0}. Expected kind=, actor= or subject=")]
    UnknownKey(String),

    #[error("unknown lookup kind: {0}. Expected self, other or unknown")]
    UnknownKind(String),

    #[error("malformed clause: {0}. Expected KEY=VALUE[,VALUE...]")]
    MalformedClause(String),
}

/// Predicate over lookup events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Classifications to keep (None = all)
    kinds: Option<HashSet<LookupKind>>,
    /// Actor national IDs to keep (None = all)
    actors: Option<HashSet<String>>,
    /// Subject national IDs to keep (None = all)
    subjects: Option<HashSet<String>>,
}

impl EventFilter {
    /// A filter that keeps every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a filter expression like `kind=other actor=111,222`.
    pub fn from_expr(expr: &str) -> Result<Self, FilterError> {
        let mut filter = Self::all();
        let mut any_clause = false;

        for clause in expr.split_whitespace() {
            any_clause = true;
            let (key, values) = clause
                .split_once('=')
                .ok_or_else(|| FilterError::MalformedClause(clause.to_string()))?;

            match key {
                "kind" => {
                    let mut kinds = HashSet::new();
                    for value in values.split(',') {
                        kinds.insert(parse_kind(value.trim())?);
                    }
                    filter.kinds = Some(kinds);
                }
                "actor" => filter.actors = Some(id_set(clause, values)?),
                "subject" => filter.subjects = Some(id_set(clause, values)?),
                other => return Err(FilterError::UnknownKey(other.to_string())),
            }
        }

        if !any_clause {
            return Err(FilterError::Empty);
        }
        Ok(filter)
    }

    /// Check whether an event passes the filter.
    pub fn matches(&self, event: &LookupEvent) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&event.kind()) {
                return false;
            }
        }
        if let Some(actors) = &self.actors {
            if !actors.contains(&event.actor_national_id) {
                return false;
            }
        }
        if let Some(subjects) = &self.subjects {
            if !subjects.contains(&event.subject_national_id) {
                return false;
            }
        }
        true
    }

    /// Apply the filter to an event slice, preserving order.
    pub fn apply<'a>(&self, events: &'a [LookupEvent]) -> Vec<&'a LookupEvent> {
        events.iter().filter(|e| self.matches(e)).collect()
    }
}

fn parse_kind(value: &str) -> Result<LookupKind, FilterError> {
    match value {
        "self" => Ok(LookupKind::SelfLookup),
        "other" => Ok(LookupKind::ThirdParty),
        "unknown" => Ok(LookupKind::Unknown),
        other => Err(FilterError::UnknownKind(other.to_string())),
    }
}

fn id_set(clause: &str, values: &str) -> Result<HashSet<String>, FilterError> {
    let set: HashSet<String> = values
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    // A clause with no values would match nothing; reject it instead
    if set.is_empty() {
        return Err(FilterError::MalformedClause(clause.to_string()));
    }
    Ok(set)
}
