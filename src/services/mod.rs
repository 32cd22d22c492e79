//! External service interactions
//!
//! - HTTP client for the remote data/analysis service
//! - Guarded background execution of remote operations

pub mod api;
pub mod guard;

pub use api::{
    split_gene_list, AnalysisKind, AnalysisOutcome, AnalysisRequest, ApiClient, ApiError,
    ClinicalFilterRequest, DownloadOutcome, UploadOutcome, FILTERED_DATASET_NAME,
};
pub use guard::{Completion, OperationGuard, OpSlot, RemoteOutcome, INDICATOR_CEILING};
