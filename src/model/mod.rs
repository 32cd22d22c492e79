//! Application state models
//!
//! Pure state types with no rendering or I/O: pages, dataset summaries,
//! pagination, the filter session state machine, alerts, and modal
//! bookkeeping.

pub mod alert;
pub mod filter;
pub mod modal;
pub mod page;
pub mod pagination;
pub mod summary;
pub mod ui;

pub use alert::{Alert, AlertQueue, Severity, ALERT_TTL};
pub use filter::{
    detect_clinical_columns, ClinicalColumns, ColumnValues, FilterOutcome, FilterPhase,
    FilterSession, VALUE_DISPLAY_LIMIT,
};
pub use modal::{Modal, ModalStack};
pub use page::Page;
pub use pagination::{pagination_controls, PageControl, PageView, PaginationState, PerPage};
pub use summary::{DatasetKind, DatasetSummary, SummaryResponse};
pub use ui::{AppMode, Focus};
