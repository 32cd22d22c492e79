//! HTTP client for the GliomaScope data/analysis service
//!
//! Every endpoint speaks JSON with a uniform envelope: a payload on
//! success, or a body carrying an `error` string meant for direct display.
//! Responses are decoded into discriminated types rather than probed for
//! field presence.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::model::{ColumnValues, DatasetKind, FilterOutcome, PageView, SummaryResponse};

/// File name under which the backend exposes the derived dataset
pub const FILTERED_DATASET_NAME: &str = "metadata_filtered.csv";

/// Gene lists are entered comma- or newline-separated
static GENE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,\n]").unwrap());

/// Split a raw gene input into trimmed, non-empty gene names
pub fn split_gene_list(input: &str) -> Vec<String> {
    GENE_SEPARATOR
        .split(input)
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Failure modes of a remote call
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request rejected before a response arrived
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success HTTP status without a readable error body
    #[error("server returned status {0}")]
    Status(u16),
    /// Body did not parse as the expected payload
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Well-formed response carrying an explicit error message; the
    /// message is shown to the user verbatim
    #[error("{0}")]
    Application(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Discriminated response envelope; the error variant must be tried first
/// so a body carrying `error` never half-parses as a payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiEnvelope<T> {
    Err(ErrorBody),
    Ok(T),
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        if let Ok(err) = serde_json::from_str::<ErrorBody>(body) {
            return Err(ApiError::Application(err.error));
        }
        return Err(ApiError::Status(status.as_u16()));
    }
    match serde_json::from_str::<ApiEnvelope<T>>(body)? {
        ApiEnvelope::Ok(payload) => Ok(payload),
        ApiEnvelope::Err(err) => Err(ApiError::Application(err.error)),
    }
}

fn parse_payload<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text()?;
    decode(status, &body)
}

/// The analytical operations the backend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Pca,
    Umap,
    DifferentialExpression,
    GeneExpression,
    Heatmap,
    ChromosomeMapping,
    Geomap,
}

impl AnalysisKind {
    /// File stem used when saving a rendered plot to disk
    pub fn file_stem(&self) -> &'static str {
        match self {
            AnalysisKind::Pca => "pca",
            AnalysisKind::Umap => "umap",
            AnalysisKind::DifferentialExpression => "differential_expression",
            AnalysisKind::GeneExpression => "gene_expression",
            AnalysisKind::Heatmap => "heatmap",
            AnalysisKind::ChromosomeMapping => "chromosome_mapping",
            AnalysisKind::Geomap => "patient_geomap",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::Pca => "PCA plot",
            AnalysisKind::Umap => "UMAP plot",
            AnalysisKind::DifferentialExpression => "Differential expression",
            AnalysisKind::GeneExpression => "Gene expression plot",
            AnalysisKind::Heatmap => "Heatmap",
            AnalysisKind::ChromosomeMapping => "Chromosome mapping",
            AnalysisKind::Geomap => "Geographic map",
        }
    }
}

/// A fully-built analysis request; opaque to everything but the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    Pca { color_by: Option<String> },
    Umap { color_by: Option<String> },
    DifferentialExpression { group_col: String, group_1: String, group_2: String },
    GeneExpression { gene_name: String, group_col: Option<String> },
    Heatmap { genes: Vec<String>, group_col: Option<String> },
    ChromosomeMapping { genes: Vec<String>, chromosome_filter: Option<String> },
    Geomap { map_type: String, zoom_enabled: bool },
}

impl AnalysisRequest {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisRequest::Pca { .. } => AnalysisKind::Pca,
            AnalysisRequest::Umap { .. } => AnalysisKind::Umap,
            AnalysisRequest::DifferentialExpression { .. } => AnalysisKind::DifferentialExpression,
            AnalysisRequest::GeneExpression { .. } => AnalysisKind::GeneExpression,
            AnalysisRequest::Heatmap { .. } => AnalysisKind::Heatmap,
            AnalysisRequest::ChromosomeMapping { .. } => AnalysisKind::ChromosomeMapping,
            AnalysisRequest::Geomap { .. } => AnalysisKind::Geomap,
        }
    }

    fn endpoint(&self) -> &'static str {
        match self {
            AnalysisRequest::Pca { .. } => "/plot_pca",
            AnalysisRequest::Umap { .. } => "/plot_umap",
            AnalysisRequest::DifferentialExpression { .. } => "/differential_expression",
            AnalysisRequest::GeneExpression { .. } => "/gene_expression",
            AnalysisRequest::Heatmap { .. } => "/heatmap",
            AnalysisRequest::ChromosomeMapping { .. } => "/chromosome_mapping",
            AnalysisRequest::Geomap { .. } => "/patient_geomap",
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            AnalysisRequest::Pca { color_by } | AnalysisRequest::Umap { color_by } => {
                json!({ "color_by": color_by })
            }
            AnalysisRequest::DifferentialExpression { group_col, group_1, group_2 } => {
                json!({ "group_col": group_col, "group_1": group_1, "group_2": group_2 })
            }
            AnalysisRequest::GeneExpression { gene_name, group_col } => {
                json!({ "gene_name": gene_name, "group_col": group_col })
            }
            AnalysisRequest::Heatmap { genes, group_col } => {
                json!({ "genes": genes, "group_col": group_col })
            }
            AnalysisRequest::ChromosomeMapping { genes, chromosome_filter } => {
                json!({ "genes": genes, "chromosome_filter": chromosome_filter })
            }
            AnalysisRequest::Geomap { map_type, zoom_enabled } => {
                json!({ "map_type": map_type, "zoom_enabled": zoom_enabled })
            }
        }
    }
}

/// What an analysis endpoint reported back
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisOutcome {
    /// Rendered plot document, when the analysis produces one
    #[serde(default)]
    pub plot_html: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total_genes: Option<u64>,
    #[serde(default)]
    pub significant_genes: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ColumnsResponse {
    #[serde(default)]
    columns: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenesResponse {
    #[serde(default)]
    genes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ResetResponse {
    #[serde(default)]
    message: String,
}

/// Result of a dataset upload; the summary replaces local state wholesale
#[derive(Debug, Clone, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub summary: SummaryResponse,
}

/// Result of fetching the derived dataset to disk
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub rows: usize,
}

/// Alternative filter body for the clinical quick filter
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ClinicalFilterRequest {
    pub grade: Option<String>,
    pub idh: Option<String>,
    pub age_range: Option<String>,
    pub grade_column: Option<String>,
    pub idh_column: Option<String>,
    pub age_column: Option<String>,
}

impl ClinicalFilterRequest {
    pub fn is_empty(&self) -> bool {
        self.grade.is_none() && self.idh.is_none() && self.age_range.is_none()
    }
}

/// Blocking HTTP client for the backend; cheap to clone into worker threads
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("gliomascope-tui/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn data_summary(&self) -> Result<SummaryResponse, ApiError> {
        parse_payload(self.http.get(self.url("/data_summary")).send()?)
    }

    pub fn view_data(&self, kind: DatasetKind, page: u32, per_page: u32) -> Result<PageView, ApiError> {
        let path = format!("/view_{}_data", kind.name());
        parse_payload(
            self.http
                .get(self.url(&path))
                .query(&[("page", page), ("per_page", per_page)])
                .send()?,
        )
    }

    pub fn column_values(&self, column: &str) -> Result<ColumnValues, ApiError> {
        parse_payload(
            self.http
                .post(self.url("/column_values"))
                .json(&json!({ "column": column }))
                .send()?,
        )
    }

    pub fn filter_by_values(&self, column: &str, values: &[String]) -> Result<FilterOutcome, ApiError> {
        parse_payload(
            self.http
                .post(self.url("/filter_metadata"))
                .json(&json!({ "column": column, "values": values }))
                .send()?,
        )
    }

    pub fn filter_clinical(&self, request: &ClinicalFilterRequest) -> Result<FilterOutcome, ApiError> {
        parse_payload(
            self.http
                .post(self.url("/filter_metadata"))
                .json(request)
                .send()?,
        )
    }

    pub fn available_columns(&self) -> Result<Vec<String>, ApiError> {
        let response: ColumnsResponse =
            parse_payload(self.http.get(self.url("/available_columns")).send()?)?;
        Ok(response.columns)
    }

    pub fn available_genes(&self) -> Result<Vec<String>, ApiError> {
        let response: GenesResponse =
            parse_payload(self.http.get(self.url("/available_genes")).send()?)?;
        Ok(response.genes)
    }

    pub fn analysis(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, ApiError> {
        parse_payload(
            self.http
                .post(self.url(request.endpoint()))
                .json(&request.body())
                .send()?,
        )
    }

    pub fn reset_data(&self) -> Result<String, ApiError> {
        let response: ResetResponse =
            parse_payload(self.http.post(self.url("/reset_data")).send()?)?;
        Ok(response.message)
    }

    pub fn upload(&self, path: &Path, file_type: &str) -> Result<UploadOutcome, ApiError> {
        let form = reqwest::blocking::multipart::Form::new()
            .text("file_type", file_type.to_string())
            .file("file", path)?;
        parse_payload(self.http.post(self.url("/upload")).multipart(form).send()?)
    }

    /// Fetch the derived dataset produced by the last applied filter
    pub fn download_filtered(&self) -> Result<Vec<u8>, ApiError> {
        let path = format!("/download/{FILTERED_DATASET_NAME}");
        let response = self.http.get(self.url(&path)).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text()?;
            if let Ok(err) = serde_json::from_str::<ErrorBody>(&body) {
                return Err(ApiError::Application(err.error));
            }
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_payload() {
        let body = r#"{"success": true, "original_count": 500, "filtered_count": 42, "preview": "| a |"}"#;
        let outcome: FilterOutcome = decode(StatusCode::OK, body).unwrap();
        assert_eq!(outcome.original_count, 500);
        assert_eq!(outcome.filtered_count, 42);
    }

    #[test]
    fn test_decode_application_error_on_ok_status() {
        let body = r#"{"error": "Column Grade not found"}"#;
        let result: Result<FilterOutcome, ApiError> = decode(StatusCode::OK, body);
        match result {
            Err(ApiError::Application(msg)) => assert_eq!(msg, "Column Grade not found"),
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_application_error_on_error_status() {
        let body = r#"{"error": "No metadata loaded"}"#;
        let result: Result<ColumnValues, ApiError> = decode(StatusCode::BAD_REQUEST, body);
        match result {
            Err(ApiError::Application(msg)) => assert_eq!(msg, "No metadata loaded"),
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_unreadable_error_status() {
        let result: Result<ColumnValues, ApiError> =
            decode(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(result, Err(ApiError::Status(502))));
    }

    #[test]
    fn test_decode_malformed_body() {
        let result: Result<PageView, ApiError> = decode(StatusCode::OK, "{not json");
        assert!(matches!(result, Err(ApiError::Malformed(_))));
    }

    #[test]
    fn test_page_view_parses() {
        let body = r#"{
            "total_rows": 230, "total_pages": 5, "current_page": 2, "per_page": 50,
            "start_row": 51, "end_row": 100, "current_data": "| id |"
        }"#;
        let view: PageView = decode(StatusCode::OK, body).unwrap();
        assert_eq!(view.current_page, 2);
        assert_eq!(view.end_row, 100);
    }

    #[test]
    fn test_split_gene_list() {
        assert_eq!(
            split_gene_list("TP53, EGFR\nIDH1 , ,\n"),
            vec!["TP53", "EGFR", "IDH1"]
        );
        assert!(split_gene_list("  \n , ").is_empty());
    }

    #[test]
    fn test_analysis_request_endpoints() {
        let requests = [
            (AnalysisRequest::Pca { color_by: None }, "/plot_pca"),
            (AnalysisRequest::Umap { color_by: None }, "/plot_umap"),
            (
                AnalysisRequest::Geomap { map_type: "individual".into(), zoom_enabled: false },
                "/patient_geomap",
            ),
        ];
        for (request, endpoint) in requests {
            assert_eq!(request.endpoint(), endpoint);
        }
    }

    #[test]
    fn test_analysis_outcome_tolerates_sparse_fields() {
        let outcome: AnalysisOutcome =
            decode(StatusCode::OK, r#"{"success": true, "plot_html": "<div/>"}"#).unwrap();
        assert!(outcome.plot_html.is_some());
        assert!(outcome.total_genes.is_none());

        let outcome: AnalysisOutcome = decode(
            StatusCode::OK,
            r#"{"success": true, "total_genes": 20000, "significant_genes": 132}"#,
        )
        .unwrap();
        assert_eq!(outcome.significant_genes, Some(132));
    }
}
