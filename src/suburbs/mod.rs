//! Suburb domain types and endpoints
//!
//! Suggestion records, the persisted selection record, and the explore and
//! report endpoints used once a suburb has been chosen.

mod reports;
mod types;

pub use reports::{ReportSection, SuburbApi, SuburbReports};
pub use types::{StoredSelection, Suggestion};
