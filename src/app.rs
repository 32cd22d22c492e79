//! Root application component
//!
//! The App struct implements the Component trait, acting as the root
//! component that routes events to child components, dispatches guarded
//! remote operations, and applies their completions to state. The active
//! page slug is kept in `location`, the single source of truth for
//! navigation.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, draw_alerts, draw_busy_indicator, draw_dataset_choice, home_lines,
    summary_lines, AnalysisPage, ConfirmDialog, DataViewerComponent, FilterBuilderComponent,
    HelpDialog, SetupComponent, SidebarComponent, SplashComponent, UploadPage,
};
use crate::config::Config;
use crate::model::{
    AlertQueue, AppMode, DatasetKind, Focus, Modal, ModalStack, Page, Severity, SummaryResponse,
};
use crate::services::{
    AnalysisKind, AnalysisOutcome, ApiClient, ApiError, ClinicalFilterRequest, Completion,
    DownloadOutcome, OperationGuard, OpSlot, RemoteOutcome, FILTERED_DATASET_NAME,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, error, warn};

/// Delay between activating a page and firing its data-population call
const PAGE_MOUNT_DELAY: Duration = Duration::from_millis(500);

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Next mode to transition to after splash
    pub next_mode_after_splash: AppMode,

    /// Which region receives key events on the running screen
    pub focus: Focus,

    /// Location fragment of the active page; `navigate` writes it and it
    /// always round-trips through `Page::from_slug`
    pub location: String,

    /// Currently active page
    pub active_page: Page,

    /// Dataset summaries, replaced wholesale on load/upload/filter/reset
    pub summary: SummaryResponse,

    /// Ephemeral notification queue
    pub alerts: AlertQueue,

    /// In-flight remote operations and the blocking indicator
    pub guard: OperationGuard,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    api: Option<ApiClient>,
    config: Option<Config>,

    /// Data-population actions scheduled by navigation, fired on a later
    /// tick once the page has settled
    deferred: Vec<(Instant, Action)>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub splash: SplashComponent,
    pub setup: SetupComponent,
    pub sidebar: SidebarComponent,
    pub viewer: DataViewerComponent,
    pub filter: FilterBuilderComponent,
    pub upload: UploadPage,
    pub pca: AnalysisPage,
    pub umap: AnalysisPage,
    pub diff_exp: AnalysisPage,
    pub gene: AnalysisPage,
    pub heatmap: AnalysisPage,
    pub chromosome: AnalysisPage,
    pub geomap: AnalysisPage,
    pub quit_dialog: ConfirmDialog,
    pub reset_dialog: ConfirmDialog,
    pub help_dialog: HelpDialog,
}

impl App {
    /// Create a new App instance; `initial_page` is the deep-link slug
    /// passed on the command line, honored like a pre-existing location
    /// fragment
    pub fn new(initial_page: Option<&str>) -> App {
        if let Some(config) = Config::load() {
            let mut app = Self::create_app(AppMode::Running);
            app.connect(config);
            if let Some(slug) = initial_page {
                app.navigate_to_slug(slug);
            }
            app
        } else {
            Self::create_app(AppMode::Setup)
        }
    }

    fn create_app(next_mode: AppMode) -> App {
        App {
            mode: AppMode::Splash,
            next_mode_after_splash: next_mode,
            focus: Focus::Sidebar,
            location: Page::Home.slug().to_string(),
            active_page: Page::Home,
            summary: SummaryResponse::default(),
            alerts: AlertQueue::new(),
            guard: OperationGuard::new(),
            modals: ModalStack::new(),
            should_quit: false,
            api: None,
            config: None,
            deferred: Vec::new(),
            // Components
            splash: SplashComponent::new(),
            setup: SetupComponent::new(),
            sidebar: SidebarComponent::new(),
            viewer: DataViewerComponent::default(),
            filter: FilterBuilderComponent::new(),
            upload: UploadPage::new(),
            pca: AnalysisPage::pca(),
            umap: AnalysisPage::umap(),
            diff_exp: AnalysisPage::differential_expression(),
            gene: AnalysisPage::gene_expression(),
            heatmap: AnalysisPage::heatmap(),
            chromosome: AnalysisPage::chromosome_mapping(),
            geomap: AnalysisPage::geomap(),
            quit_dialog: ConfirmDialog::quit(),
            reset_dialog: ConfirmDialog::reset(),
            help_dialog: HelpDialog::default(),
        }
    }

    fn connect(&mut self, config: Config) {
        match ApiClient::new(&config.server_url, config.request_timeout()) {
            Ok(api) => self.api = Some(api),
            Err(e) => {
                error!("failed to build HTTP client: {e}");
                self.alerts.notify(
                    format!("Failed to initialize HTTP client: {e}"),
                    Severity::Danger,
                );
            }
        }
        self.config = Some(config);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Activate `page`: update the location fragment, the sidebar marker,
    /// and schedule the page's data-population call. Idempotent.
    fn navigate(&mut self, page: Page) {
        self.active_page = page;
        self.location = page.slug().to_string();
        self.sidebar.sync_active(page);
        self.focus = Focus::Content;
        self.sidebar.focused = false;
        self.viewer.close();

        match page {
            Page::DataExploration => self.defer(Action::LoadSummary),
            Page::PcaAnalysis | Page::UmapAnalysis => self.defer(Action::PopulateColumns),
            Page::GeneExplorer | Page::Heatmap | Page::ChromosomeMapping => {
                self.defer(Action::PopulateGenes)
            }
            _ => {}
        }
    }

    /// Resolve a slug and navigate; an unknown slug is a logged no-op
    fn navigate_to_slug(&mut self, slug: &str) {
        match Page::from_slug(slug) {
            Some(page) => self.navigate(page),
            None => warn!("navigation target not found: {slug}"),
        }
    }

    fn defer(&mut self, action: Action) {
        self.deferred.push((Instant::now() + PAGE_MOUNT_DELAY, action));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Remote Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    fn api_client(&mut self) -> Option<ApiClient> {
        if self.api.is_none() {
            self.alerts
                .notify("No backend configured", Severity::Danger);
        }
        self.api.clone()
    }

    fn dispatch_summary(&mut self) {
        let Some(api) = self.api.clone() else { return };
        self.guard
            .spawn_quiet(OpSlot::Summary, move || {
                RemoteOutcome::Summary(api.data_summary())
            });
    }

    fn dispatch_columns(&mut self) {
        let Some(api) = self.api.clone() else { return };
        self.guard.spawn_quiet(OpSlot::Columns, move || {
            RemoteOutcome::Columns(api.available_columns())
        });
    }

    fn dispatch_genes(&mut self) {
        let Some(api) = self.api.clone() else { return };
        self.guard.spawn_quiet(OpSlot::Genes, move || {
            RemoteOutcome::Genes(api.available_genes())
        });
    }

    fn dispatch_page(&mut self, kind: DatasetKind, page: u32) {
        let Some(api) = self.api_client() else { return };
        let per_page = self
            .viewer
            .pagination
            .as_ref()
            .map(|p| p.per_page.as_u32())
            .unwrap_or(50);
        self.viewer.begin_loading(page);
        self.guard.spawn(OpSlot::PageData(kind), move || {
            RemoteOutcome::PageData {
                kind,
                result: api.view_data(kind, page, per_page),
            }
        });
    }

    fn dispatch_column_values(&mut self, column: String) {
        let Some(api) = self.api_client() else { return };
        self.guard.spawn(OpSlot::ColumnValues, move || {
            RemoteOutcome::ColumnValues(api.column_values(&column))
        });
    }

    fn dispatch_value_filter(&mut self, column: String, values: Vec<String>) {
        let Some(api) = self.api_client() else { return };
        self.guard.spawn(OpSlot::Filter, move || {
            RemoteOutcome::FilterApplied(api.filter_by_values(&column, &values))
        });
    }

    fn dispatch_clinical_filter(&mut self, request: ClinicalFilterRequest) {
        let Some(api) = self.api_client() else { return };
        self.guard.spawn(OpSlot::Filter, move || {
            RemoteOutcome::FilterApplied(api.filter_clinical(&request))
        });
    }

    fn dispatch_analysis(&mut self, request: crate::services::AnalysisRequest) {
        let Some(api) = self.api_client() else { return };
        let kind = request.kind();
        self.guard.spawn(OpSlot::Analysis, move || {
            RemoteOutcome::Analysis {
                kind,
                result: api.analysis(&request),
            }
        });
    }

    fn dispatch_upload(&mut self, path: PathBuf, file_type: &'static str) {
        let Some(api) = self.api_client() else { return };
        self.guard.spawn(OpSlot::Upload, move || {
            RemoteOutcome::Upload(api.upload(&path, file_type))
        });
    }

    fn dispatch_reset(&mut self) {
        let Some(api) = self.api_client() else { return };
        self.alerts.notify("Resetting all data...", Severity::Info);
        self.guard
            .spawn(OpSlot::Reset, move || RemoteOutcome::Reset(api.reset_data()));
    }

    fn dispatch_download(&mut self) {
        let Some(api) = self.api_client() else { return };
        let dir = self.download_dir();
        self.guard.spawn(OpSlot::Download, move || {
            let result = (|| -> Result<DownloadOutcome, ApiError> {
                let bytes = api.download_filtered()?;
                std::fs::create_dir_all(&dir)?;
                let path = dir.join(FILTERED_DATASET_NAME);
                std::fs::write(&path, &bytes)?;
                let mut reader = csv::Reader::from_reader(bytes.as_slice());
                let rows = reader.records().filter(|r| r.is_ok()).count();
                Ok(DownloadOutcome { path, rows })
            })();
            RemoteOutcome::Download(result)
        });
    }

    fn download_dir(&self) -> PathBuf {
        self.config
            .as_ref()
            .map(|c| c.download_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Completion Handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a worker-thread completion to state. Completions whose token
    /// has been superseded are discarded so late responses to stale
    /// requests cannot clobber newer state.
    fn apply_completion(&mut self, completion: Completion) {
        if !self.guard.is_current(completion.slot, completion.token) {
            debug!("discarding stale completion for {:?}", completion.slot);
            return;
        }

        match completion.outcome {
            RemoteOutcome::Summary(Ok(summary)) => {
                let loaded = !summary.is_empty();
                self.summary = summary;
                if let Some(metadata) = &self.summary.metadata {
                    self.filter.set_columns(&metadata.columns);
                }
                if loaded {
                    self.alerts.notify(
                        "Data loaded successfully! You can now proceed with analysis.",
                        Severity::Success,
                    );
                }
            }
            RemoteOutcome::Summary(Err(e)) => {
                // Background refresh; not worth an alert
                error!("summary load failed: {e}");
            }
            RemoteOutcome::PageData { result: Ok(view), .. } => {
                self.viewer.apply_view(view);
            }
            RemoteOutcome::PageData { result: Err(e), .. } => {
                self.viewer.apply_error(e.to_string());
            }
            RemoteOutcome::ColumnValues(Ok(values)) => {
                self.filter.values_loaded(values);
            }
            RemoteOutcome::ColumnValues(Err(e)) => {
                self.alerts.notify(e.to_string(), Severity::Danger);
            }
            RemoteOutcome::FilterApplied(Ok(outcome)) => {
                let filtered = outcome.filtered_count;
                self.filter.apply_succeeded(outcome);
                self.alerts
                    .notify(format!("Filtered data: {filtered} samples"), Severity::Success);
                // The filter produced a new working dataset
                self.dispatch_summary();
            }
            RemoteOutcome::FilterApplied(Err(e)) => {
                self.alerts.notify(e.to_string(), Severity::Danger);
            }
            RemoteOutcome::Columns(Ok(columns)) => {
                for page in self.analysis_pages_mut() {
                    page.set_column_choices(&columns);
                }
            }
            RemoteOutcome::Columns(Err(e)) => {
                error!("column list load failed: {e}");
            }
            RemoteOutcome::Genes(Ok(genes)) => {
                let count = genes.len();
                for page in [&mut self.gene, &mut self.heatmap, &mut self.chromosome] {
                    page.gene_count = Some(count);
                }
            }
            RemoteOutcome::Genes(Err(e)) => {
                error!("gene list load failed: {e}");
            }
            RemoteOutcome::Analysis { kind, result: Ok(outcome) } => {
                self.apply_analysis_outcome(kind, outcome);
            }
            RemoteOutcome::Analysis { kind, result: Err(e) } => {
                self.alerts.notify(e.to_string(), Severity::Danger);
                self.page_for_mut(kind).status = None;
            }
            RemoteOutcome::Reset(Ok(message)) => {
                self.apply_reset(message);
            }
            RemoteOutcome::Reset(Err(e)) => {
                self.alerts
                    .notify(format!("Error resetting data: {e}"), Severity::Danger);
            }
            RemoteOutcome::Upload(Ok(outcome)) => {
                let file_type = outcome
                    .file_type
                    .unwrap_or_else(|| self.upload.file_type().to_string());
                self.summary = outcome.summary;
                if let Some(metadata) = &self.summary.metadata {
                    self.filter.set_columns(&metadata.columns);
                }
                self.upload.status = Some(format!("Last upload: {file_type}"));
                self.upload.reset_form();
                self.alerts.notify(
                    format!("File uploaded successfully as {file_type}!"),
                    Severity::Success,
                );
            }
            RemoteOutcome::Upload(Err(e)) => {
                self.alerts
                    .notify(format!("Error uploading file: {e}"), Severity::Danger);
            }
            RemoteOutcome::Download(Ok(outcome)) => {
                self.alerts.notify(
                    format!(
                        "Saved {} filtered rows to {}",
                        outcome.rows,
                        outcome.path.display()
                    ),
                    Severity::Success,
                );
            }
            RemoteOutcome::Download(Err(e)) => {
                self.alerts
                    .notify(format!("Download failed: {e}"), Severity::Danger);
            }
        }
    }

    fn apply_analysis_outcome(&mut self, kind: AnalysisKind, outcome: AnalysisOutcome) {
        if let Some(html) = &outcome.plot_html {
            match self.save_plot(kind, html) {
                Ok(path) => {
                    let message =
                        format!("{} generated, saved to {}", kind.label(), path.display());
                    self.page_for_mut(kind).status = Some(message.clone());
                    self.alerts.notify(message, Severity::Success);
                }
                Err(e) => {
                    self.alerts
                        .notify(format!("Failed to save plot: {e}"), Severity::Danger);
                }
            }
        } else if let (Some(total), Some(significant)) =
            (outcome.total_genes, outcome.significant_genes)
        {
            let message =
                format!("Analysis complete: {significant} significant of {total} genes");
            self.page_for_mut(kind).status = Some(message.clone());
            self.alerts.notify(message, Severity::Success);
        } else {
            let message = outcome
                .message
                .unwrap_or_else(|| format!("{} generated successfully", kind.label()));
            self.page_for_mut(kind).status = Some(message.clone());
            self.alerts.notify(message, Severity::Success);
        }
    }

    fn apply_reset(&mut self, message: String) {
        self.summary = SummaryResponse::default();
        self.filter.clear();
        self.viewer.close();
        self.upload.status = None;
        for page in [
            &mut self.pca,
            &mut self.umap,
            &mut self.diff_exp,
            &mut self.gene,
            &mut self.heatmap,
            &mut self.chromosome,
            &mut self.geomap,
        ] {
            page.status = None;
            page.gene_count = None;
            page.set_column_choices(&[]);
        }
        let message = if message.is_empty() {
            "All data has been reset".to_string()
        } else {
            message
        };
        self.alerts.notify(message, Severity::Success);
        self.navigate(Page::Home);
    }

    fn save_plot(&self, kind: AnalysisKind, html: &str) -> Result<PathBuf> {
        let dir = self.download_dir();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.html", kind.file_stem()));
        std::fs::write(&path, html)?;
        Ok(path)
    }

    fn page_for_mut(&mut self, kind: AnalysisKind) -> &mut AnalysisPage {
        match kind {
            AnalysisKind::Pca => &mut self.pca,
            AnalysisKind::Umap => &mut self.umap,
            AnalysisKind::DifferentialExpression => &mut self.diff_exp,
            AnalysisKind::GeneExpression => &mut self.gene,
            AnalysisKind::Heatmap => &mut self.heatmap,
            AnalysisKind::ChromosomeMapping => &mut self.chromosome,
            AnalysisKind::Geomap => &mut self.geomap,
        }
    }

    fn analysis_pages_mut(&mut self) -> [&mut AnalysisPage; 5] {
        [
            &mut self.pca,
            &mut self.umap,
            &mut self.diff_exp,
            &mut self.gene,
            &mut self.heatmap,
        ]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.splash.init()?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.mode {
            AppMode::Splash => self.splash.handle_key_event(key),
            AppMode::Setup => self.setup.handle_key_event(key),
            AppMode::Running => {
                if self.modals.top().is_some() {
                    return self.handle_modal_key_event(key);
                }
                match self.focus {
                    Focus::Sidebar => self.handle_sidebar_key_event(key),
                    Focus::Content => self.handle_content_key_event(key),
                }
            }
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if self.mode == AppMode::Splash && self.splash.is_complete() {
                    return Ok(Some(Action::SplashComplete));
                }

                let now = Instant::now();

                // Apply finished remote work, then enforce the indicator
                // ceiling and the alert TTL
                let completions = self.guard.poll();
                for completion in completions {
                    self.apply_completion(completion);
                }
                self.guard.prune_expired(now);
                self.alerts.prune(now);

                // Fire data-population actions scheduled by navigation
                let mut due = Vec::new();
                self.deferred.retain(|(when, action)| {
                    if *when <= now {
                        due.push(action.clone());
                        false
                    } else {
                        true
                    }
                });
                for action in due {
                    self.update(action)?;
                }
            }
            Action::SplashComplete => {
                self.mode = self.next_mode_after_splash;
            }
            Action::SetupConfirm => {
                if let Some(config) = self.setup.get_config().cloned() {
                    self.connect(config);
                    self.mode = AppMode::Running;
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::Navigate(page) => {
                self.navigate(page);
            }
            Action::ToggleFocus => {
                self.focus = self.focus.toggled();
                self.sidebar.focused = self.focus == Focus::Sidebar;
            }

            // ─────────────────────────────────────────────────────────────────
            // Data Population
            // ─────────────────────────────────────────────────────────────────
            Action::LoadSummary => self.dispatch_summary(),
            Action::PopulateColumns => self.dispatch_columns(),
            Action::PopulateGenes => self.dispatch_genes(),

            // ─────────────────────────────────────────────────────────────────
            // Paginated Viewer
            // ─────────────────────────────────────────────────────────────────
            Action::OpenDatasetChoice => {
                self.modals.push(Modal::DatasetChoice {
                    selected: DatasetKind::Metadata,
                });
            }
            Action::ViewDataset(kind) => {
                let load = self.viewer.open(kind);
                return self.update(load);
            }
            Action::LoadPage { kind, page } => self.dispatch_page(kind, page),
            Action::NextPage => {
                if let Some(load) = self.viewer.page_step(1) {
                    return self.update(load);
                }
            }
            Action::PrevPage => {
                if let Some(load) = self.viewer.page_step(-1) {
                    return self.update(load);
                }
            }
            Action::FirstPage => {
                if let Some(load) = self.viewer.page_jump(false) {
                    return self.update(load);
                }
            }
            Action::LastPage => {
                if let Some(load) = self.viewer.page_jump(true) {
                    return self.update(load);
                }
            }
            Action::CyclePerPage => {
                if let Some(load) = self.viewer.cycle_per_page() {
                    return self.update(load);
                }
            }
            Action::CloseViewer => self.viewer.close(),

            // ─────────────────────────────────────────────────────────────────
            // Scrolling (viewer owns the only scrollable region)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                self.viewer.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Filter Builder
            // ─────────────────────────────────────────────────────────────────
            Action::FilterLoadValues(column) => {
                self.filter.session.select_column(&column);
                self.dispatch_column_values(column);
            }
            Action::ApplyFilter => {
                if !self.filter.session.can_apply() {
                    self.alerts.notify(
                        "Please select at least one value to filter by",
                        Severity::Warning,
                    );
                } else {
                    let column = self
                        .filter
                        .session
                        .column
                        .clone()
                        .unwrap_or_default();
                    let values = self.filter.session.selected_values();
                    self.dispatch_value_filter(column, values);
                }
            }
            Action::CancelFilter => self.filter.session.cancel(),
            Action::SubmitClinicalFilter => {
                let request = self.filter.clinical_request();
                if request.is_empty() {
                    self.alerts.notify(
                        "Please enter at least one filter value",
                        Severity::Warning,
                    );
                } else {
                    self.dispatch_clinical_filter(request);
                }
            }
            Action::DownloadFiltered => self.dispatch_download(),

            // ─────────────────────────────────────────────────────────────────
            // Forms
            // ─────────────────────────────────────────────────────────────────
            Action::SubmitAnalysis(kind) => {
                match self.page_for_mut(kind).build_request() {
                    Ok(request) => self.dispatch_analysis(request),
                    Err(warning) => self.alerts.notify(warning, Severity::Warning),
                }
            }
            Action::SubmitUpload => match self.upload.build_request() {
                Ok((path, file_type)) => self.dispatch_upload(path, file_type),
                Err(warning) => self.alerts.notify(warning, Severity::Warning),
            },

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenResetConfirm => self.modals.push(Modal::ResetConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(modal) = self.modals.top().cloned() {
                    match modal {
                        Modal::QuitConfirm => {
                            self.should_quit = true;
                        }
                        Modal::ResetConfirm => {
                            self.modals.pop();
                            return self.update(Action::ResetData);
                        }
                        Modal::DatasetChoice { selected } => {
                            self.modals.pop();
                            return self.update(Action::ViewDataset(selected));
                        }
                        Modal::Help => {
                            self.modals.pop();
                        }
                    }
                }
            }
            Action::ModalUp | Action::ModalDown => {
                if let Some(Modal::DatasetChoice { selected }) = self.modals.top_mut() {
                    *selected = match selected {
                        DatasetKind::Metadata => DatasetKind::Expression,
                        DatasetKind::Expression => DatasetKind::Metadata,
                    };
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Misc
            // ─────────────────────────────────────────────────────────────────
            Action::ResetData => self.dispatch_reset(),
            Action::DismissAlert => self.alerts.dismiss(),
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Splash => self.splash.draw(frame, area)?,
            AppMode::Setup => self.setup.draw(frame, area)?,
            AppMode::Running => {
                let layout = calculate_main_layout(area);
                self.sidebar.draw(frame, layout.sidebar)?;
                self.draw_content(frame, layout.content)?;
                self.draw_help_bar(frame, layout.help);

                if self.guard.is_busy() {
                    draw_busy_indicator(
                        frame,
                        area,
                        self.guard.busy_since(),
                        self.guard.pending_count(),
                    );
                }

                if let Some(modal) = self.modals.top().cloned() {
                    self.draw_modal(frame, area, &modal)?;
                }
            }
        }

        // Alerts render on top of everything
        draw_alerts(frame, area, &self.alerts);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Key Routing
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_sidebar_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(action) = self.sidebar.handle_key_event(key)? {
            return Ok(Some(action));
        }
        let action = match key.code {
            KeyCode::Tab | KeyCode::BackTab => Some(Action::ToggleFocus),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('R') => Some(Action::OpenResetConfirm),
            KeyCode::Char('x') => Some(Action::DismissAlert),
            _ => None,
        };
        Ok(action)
    }

    fn handle_content_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(action) = self.route_page_key(key)? {
            return Ok(Some(action));
        }

        // Fallback bindings; printable chars stay out of the way while a
        // text input is focused
        let action = match key.code {
            KeyCode::BackTab => Some(Action::ToggleFocus),
            KeyCode::Esc => Some(Action::ToggleFocus),
            // Tab cycles fields inside forms; it only returns to the
            // sidebar from pages without one
            KeyCode::Tab if self.active_page == Page::Home || self.viewer.open => {
                Some(Action::ToggleFocus)
            }
            _ if self.content_wants_text() => None,
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('R') => Some(Action::OpenResetConfirm),
            KeyCode::Char('x') => Some(Action::DismissAlert),
            KeyCode::Char('v') if self.active_page == Page::DataExploration => {
                Some(Action::OpenDatasetChoice)
            }
            KeyCode::Char('s') if self.active_page == Page::DataExploration => {
                Some(Action::LoadSummary)
            }
            _ => None,
        };
        Ok(action)
    }

    fn route_page_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.active_page {
            Page::Home => Ok(None),
            Page::DataUpload => self.upload.handle_key_event(key),
            Page::DataExploration => {
                if self.viewer.open {
                    self.viewer.handle_key_event(key)
                } else {
                    self.filter.handle_key_event(key)
                }
            }
            Page::PcaAnalysis => self.pca.handle_key_event(key),
            Page::UmapAnalysis => self.umap.handle_key_event(key),
            Page::DifferentialExpression => self.diff_exp.handle_key_event(key),
            Page::GeneExplorer => self.gene.handle_key_event(key),
            Page::Heatmap => self.heatmap.handle_key_event(key),
            Page::ChromosomeMapping => self.chromosome.handle_key_event(key),
            Page::GeographicViz => self.geomap.handle_key_event(key),
        }
    }

    fn content_wants_text(&self) -> bool {
        match self.active_page {
            Page::Home => false,
            Page::DataUpload => self.upload.wants_text_input(),
            Page::DataExploration => !self.viewer.open && self.filter.wants_text_input(),
            Page::PcaAnalysis => self.pca.wants_text_input(),
            Page::UmapAnalysis => self.umap.wants_text_input(),
            Page::DifferentialExpression => self.diff_exp.wants_text_input(),
            Page::GeneExplorer => self.gene.wants_text_input(),
            Page::Heatmap => self.heatmap.wants_text_input(),
            Page::ChromosomeMapping => self.chromosome.wants_text_input(),
            Page::GeographicViz => self.geomap.wants_text_input(),
        }
    }

    fn handle_modal_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(modal) = self.modals.top().cloned() else {
            return Ok(None);
        };
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::ResetConfirm => self.reset_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::DatasetChoice { .. } => {
                let action = match key.code {
                    KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalDown),
                    KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalUp),
                    KeyCode::Enter => Some(Action::ConfirmModal),
                    KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
                    _ => None,
                };
                Ok(action)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Drawing
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn draw_content(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.active_page {
            Page::Home => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .title(" Home ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                    .border_style(Style::default().fg(Color::DarkGray));
                let inner = block.inner(area);
                frame.render_widget(block, area);
                frame.render_widget(Paragraph::new(home_lines(&self.summary)), inner);
            }
            Page::DataUpload => self.upload.draw(frame, area)?,
            Page::DataExploration => {
                if self.viewer.open {
                    self.viewer.draw(frame, area)?;
                } else {
                    let mut lines = summary_lines(&self.summary);
                    lines.push(Line::from(Span::styled(
                        "  v view dataset • s refresh summary",
                        Style::default().fg(Color::DarkGray),
                    )));
                    let summary_height = (lines.len() as u16 + 2).min(area.height / 2);

                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(summary_height), Constraint::Min(8)])
                        .split(area);

                    let block = Block::default()
                        .borders(Borders::ALL)
                        .title(" Data Summary ")
                        .title_style(
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        )
                        .border_style(Style::default().fg(Color::DarkGray));
                    let inner = block.inner(chunks[0]);
                    frame.render_widget(block, chunks[0]);
                    frame.render_widget(Paragraph::new(lines), inner);

                    self.filter.draw(frame, chunks[1])?;
                }
            }
            Page::PcaAnalysis => self.pca.draw(frame, area)?,
            Page::UmapAnalysis => self.umap.draw(frame, area)?,
            Page::DifferentialExpression => self.diff_exp.draw(frame, area)?,
            Page::GeneExplorer => self.gene.draw(frame, area)?,
            Page::Heatmap => self.heatmap.draw(frame, area)?,
            Page::ChromosomeMapping => self.chromosome.draw(frame, area)?,
            Page::GeographicViz => self.geomap.draw(frame, area)?,
        }
        Ok(())
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let spans = match self.focus {
            Focus::Sidebar => vec![
                Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
                Span::raw("Navigate  "),
                Span::styled(" Enter ", Style::default().fg(Color::Cyan)),
                Span::raw("Open page  "),
                Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
                Span::raw("Focus page  "),
                Span::styled(" ? ", Style::default().fg(Color::Cyan)),
                Span::raw("Help  "),
                Span::styled(" q ", Style::default().fg(Color::Cyan)),
                Span::raw("Quit"),
            ],
            Focus::Content => vec![
                Span::styled(" Shift+Tab ", Style::default().fg(Color::Cyan)),
                Span::raw("Sidebar  "),
                Span::styled(" Esc ", Style::default().fg(Color::Cyan)),
                Span::raw("Back  "),
                Span::styled(" ? ", Style::default().fg(Color::Cyan)),
                Span::raw("Help"),
            ],
        };

        let help = Paragraph::new(Line::from(spans))
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, area);
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::ResetConfirm => self.reset_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
            Modal::DatasetChoice { selected } => draw_dataset_choice(frame, area, *selected),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::filter::ColumnValues;
    use crate::model::FilterPhase;

    fn running_app() -> App {
        let mut app = App::create_app(AppMode::Running);
        app.mode = AppMode::Running;
        app
    }

    #[test]
    fn test_navigate_round_trips_through_location() {
        let mut app = running_app();
        app.navigate(Page::PcaAnalysis);
        assert_eq!(app.location, "pca-analysis");
        assert_eq!(Page::from_slug(&app.location), Some(Page::PcaAnalysis));
        assert_eq!(app.active_page, Page::PcaAnalysis);
    }

    #[test]
    fn test_navigate_is_idempotent() {
        let mut app = running_app();
        app.navigate(Page::Heatmap);
        let location = app.location.clone();
        let deferred_len = app.deferred.len();

        app.navigate(Page::Heatmap);
        assert_eq!(app.location, location);
        assert_eq!(app.active_page, Page::Heatmap);
        // A second visit schedules nothing new for a page with no loader
        assert_eq!(app.deferred.len(), deferred_len);
    }

    #[test]
    fn test_unknown_slug_keeps_previous_page_active() {
        let mut app = running_app();
        app.navigate(Page::DataExploration);
        app.navigate_to_slug("no-such-page");
        assert_eq!(app.active_page, Page::DataExploration);
        assert_eq!(app.location, "data-exploration");
    }

    #[test]
    fn test_navigation_schedules_deferred_population() {
        let mut app = running_app();
        app.navigate(Page::DataExploration);
        assert_eq!(app.deferred.len(), 1);
        assert_eq!(app.deferred[0].1, Action::LoadSummary);

        app.navigate(Page::UmapAnalysis);
        assert_eq!(app.deferred.len(), 2);
        assert_eq!(app.deferred[1].1, Action::PopulateColumns);
    }

    #[test]
    fn test_apply_filter_with_empty_selection_sends_nothing() {
        let mut app = running_app();
        app.filter.session.select_column("grade");
        app.filter.values_loaded(ColumnValues {
            values: vec!["II".into(), "IV".into()],
            counts: vec![3, 4],
        });

        app.update(Action::ApplyFilter).unwrap();

        assert!(!app.guard.is_busy());
        assert_eq!(app.alerts.len(), 1);
        // The session is untouched by the rejected apply
        assert_eq!(app.filter.session.phase, FilterPhase::ValuesLoaded);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut app = running_app();
        let first = app
            .guard
            .spawn_quiet(OpSlot::Summary, || RemoteOutcome::Reset(Ok(String::new())));
        app.guard
            .spawn_quiet(OpSlot::Summary, || RemoteOutcome::Reset(Ok(String::new())));

        let mut summary = SummaryResponse::default();
        summary.metadata = Some(crate::model::DatasetSummary {
            shape: (10, 2),
            missing_values: 0,
            duplicates: 0,
            columns: vec!["grade".into()],
            preview: String::new(),
        });

        app.apply_completion(Completion {
            slot: OpSlot::Summary,
            token: first,
            outcome: RemoteOutcome::Summary(Ok(summary)),
        });

        // The superseded response must not be applied
        assert!(app.summary.is_empty());
    }

    #[test]
    fn test_reset_completion_clears_state_and_navigates_home() {
        let mut app = running_app();
        app.navigate(Page::DataExploration);
        app.filter.session.select_column("grade");
        let token = app
            .guard
            .spawn_quiet(OpSlot::Reset, || RemoteOutcome::Reset(Ok(String::new())));

        app.apply_completion(Completion {
            slot: OpSlot::Reset,
            token,
            outcome: RemoteOutcome::Reset(Ok("All data cleared".to_string())),
        });

        assert!(app.summary.is_empty());
        assert_eq!(app.filter.session.phase, FilterPhase::Idle);
        assert_eq!(app.active_page, Page::Home);
        assert!(app.alerts.len() >= 1);
    }

    #[test]
    fn test_confirm_dataset_choice_opens_viewer() {
        let mut app = running_app();
        app.update(Action::OpenDatasetChoice).unwrap();
        app.update(Action::ModalDown).unwrap();
        app.update(Action::ConfirmModal).unwrap();

        assert!(app.modals.is_empty());
        assert!(app.viewer.open);
        assert_eq!(app.viewer.current_kind(), Some(DatasetKind::Expression));
    }
}
