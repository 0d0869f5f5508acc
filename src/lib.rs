//! Veedor - payroll lookup audit analyzer
//!
//! This library ingests the consultation log a payroll system exports,
//! reconstructs who queried whose record and when, and derives bounded
//! risk scores: a suspicion score per querying user and an exposure score
//! per looked-up identity. The whole pipeline is synchronous and runs once
//! per uploaded document; see [`report::AuditReport::from_text`].

pub mod csv_output;
pub mod dates;
pub mod filter;
pub mod json_output;
pub mod parser;
pub mod record;
pub mod report;
pub mod score;
pub mod subject_stats;
pub mod summary;
pub mod user_stats;

pub use filter::EventFilter;
pub use record::{LookupEvent, LookupKind};
pub use report::AuditReport;
pub use subject_stats::SubjectProfile;
pub use summary::DatasetSummary;
pub use user_stats::UserProfile;
