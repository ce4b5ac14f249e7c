//! Rendering contracts for the external reporting collaborator: per-rule
//! summary tables and the testing-guide checklist. No terminal or file
//! output happens here; callers receive strings.

pub mod checklist;
pub mod table;

pub use checklist::{render_checklist, render_checklist_csv, ItemStatus, TESTING_GUIDE};
pub use table::{render_table, summary_table};
