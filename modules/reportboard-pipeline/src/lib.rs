//! Report filtering and aggregation.
//!
//! A records snapshot (`RecordStore`) and the current filter selection
//! (`FilterCriteria`) go in; the filtered sequence, three distributions and
//! the header summary come out. Everything here is synchronous and pure
//! apart from the clock, which is injected so "now" can be frozen.
//!
//! `Dashboard` wires the pieces together: every input change recomputes the
//! whole view from scratch and pushes it to the registered `ViewSink`s.

pub mod aggregate;
pub mod clock;
pub mod criteria;
pub mod dashboard;
pub mod filter;
pub mod store;
pub mod summary;

pub use aggregate::{aggregate, Aggregates, DistributionEntry, Unrecognized};
pub use clock::{Clock, FixedClock, SystemClock};
pub use criteria::{CategoryFilter, CriteriaUpdate, FilterCriteria, TimeWindow};
pub use dashboard::{Dashboard, DashboardView, MemoryViewSink, ViewSink};
pub use filter::filter_reports;
pub use store::{RecordStore, SnapshotAnomalies};
pub use summary::{summarize, SummaryCards};
