//! Working tree status inspection
//!
//! Status compares three snapshots of the repository: the working tree, the
//! index and the tree of the commit HEAD points at.
//!
//! ## Components
//!
//! - `file_change`: Enum types for categorizing changes
//! - `inspector`: Per-path comparisons between the three snapshots
//! - `status_report`: The aggregated result handed to the presentation layer

pub mod file_change;
pub mod inspector;
pub mod status_report;
