//! Action enum - All possible application actions
//!
//! Components emit Actions in response to events, and the App processes
//! them to update state and dispatch remote work.

use std::fmt;

use crate::model::{DatasetKind, Page};
use crate::services::AnalysisKind;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for timers and background-job polling
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,
    /// Transition from splash to main app
    SplashComplete,
    /// Setup wizard finished; switch to the running screen
    SetupConfirm,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Activate a page
    Navigate(Page),
    /// Toggle key focus between the sidebar and the page content
    ToggleFocus,

    // ─────────────────────────────────────────────────────────────────────────
    // Data Population
    // ─────────────────────────────────────────────────────────────────────────
    /// Refresh the dataset summaries
    LoadSummary,
    /// Refresh the metadata column list for the color-by selectors
    PopulateColumns,
    /// Refresh the available-gene count shown on gene-entry forms
    PopulateGenes,

    // ─────────────────────────────────────────────────────────────────────────
    // Paginated Viewer
    // ─────────────────────────────────────────────────────────────────────────
    /// Ask which dataset to open in the viewer
    OpenDatasetChoice,
    /// Open the viewer on a dataset, starting at page 1
    ViewDataset(DatasetKind),
    /// Fetch a page of a dataset
    LoadPage { kind: DatasetKind, page: u32 },
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    /// Cycle the page density (25 -> 50 -> 100); always returns to page 1
    CyclePerPage,
    /// Close the viewer and return to the exploration sections
    CloseViewer,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Filter Builder
    // ─────────────────────────────────────────────────────────────────────────
    /// Begin a filter session on a column and fetch its distinct values
    FilterLoadValues(String),
    /// Apply the current filter session
    ApplyFilter,
    /// Discard the current filter session
    CancelFilter,
    /// Submit the clinical quick filter (grade / IDH / age range)
    SubmitClinicalFilter,
    /// Fetch the derived dataset produced by the last filter
    DownloadFiltered,

    // ─────────────────────────────────────────────────────────────────────────
    // Forms
    // ─────────────────────────────────────────────────────────────────────────
    /// Submit the analysis form of the given kind
    SubmitAnalysis(AnalysisKind),
    /// Submit the upload form
    SubmitUpload,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenResetConfirm,
    OpenHelp,
    CloseModal,
    ConfirmModal,
    ModalUp,
    ModalDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Misc
    // ─────────────────────────────────────────────────────────────────────────
    /// Clear all backend data after confirmation
    ResetData,
    /// Manually dismiss the newest alert
    DismissAlert,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
