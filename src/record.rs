//! Normalized lookup event records
//!
//! One `LookupEvent` is produced per successfully parsed consultation line.
//! Identity fields are kept verbatim (trimmed) from the source text; the
//! classification is derived once at parse time.

use crate::dates::Timestamp;
use serde::{Deserialize, Serialize};

/// Literal sentinel the source system emits when a looked-up identity could
/// not be resolved. The match is deliberately literal and case-sensitive
/// for compatibility with the upstream export; this is a business rule of
/// the source system, not an identity-resolution mechanism.
pub const UNKNOWN_SENTINEL: &str = "Desconocido";

/// Classification of a single lookup. Unknown takes precedence over the
/// self/third-party distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKind {
    /// Actor looked up their own record
    SelfLookup,
    /// Actor looked up someone else's record
    ThirdParty,
    /// Subject identity unresolved in the source system
    Unknown,
}

/// A single payroll-record lookup, reconstructed from one detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEvent {
    /// Internal user key of the querying user (`Pkusuario`)
    pub actor_id: String,
    /// Personnel file number of the querying user (`Legajo`)
    pub actor_badge_number: String,
    /// National ID of the querying user
    pub actor_national_id: String,
    /// Display name of the querying user
    pub actor_name: String,
    /// National ID that was looked up
    pub subject_national_id: String,
    pub subject_last_name: String,
    pub subject_first_name: String,
    /// When the lookup happened (best-effort normalized)
    pub timestamp: Timestamp,
    /// True when either subject name field equals the literal sentinel
    pub is_unknown_subject: bool,
    /// True when actor and subject share the same national ID
    pub is_self_lookup: bool,
}

impl LookupEvent {
    /// Classification used by the aggregators; unknown wins over self.
    pub fn kind(&self) -> LookupKind {
        if self.is_unknown_subject {
            LookupKind::Unknown
        } else if self.is_self_lookup {
            LookupKind::SelfLookup
        } else {
            LookupKind::ThirdParty
        }
    }

    /// Human-readable subject identifier: `LastName FirstName (NationalId)`.
    pub fn subject_label(&self) -> String {
        format!(
            "{} {} ({})",
            self.subject_last_name, self.subject_first_name, self.subject_national_id
        )
    }

    /// Human-readable actor identifier: `Name (NationalId)`.
    pub fn actor_label(&self) -> String {
        format!("{} ({})", self.actor_name, self.actor_national_id)
    }
}
