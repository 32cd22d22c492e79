//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering
//! logic. Components communicate through Actions rather than direct state
//! mutation.

pub mod alerts;
pub mod analysis;
pub mod confirm;
pub mod data_viewer;
pub mod dataset_choice;
pub mod filter_builder;
pub mod help_dialog;
pub mod indicator;
pub mod layout;
pub mod setup;
pub mod sidebar;
pub mod splash;
pub mod summary_panel;
pub mod table;
pub mod upload;

pub use alerts::draw_alerts;
pub use analysis::AnalysisPage;
pub use confirm::ConfirmDialog;
pub use data_viewer::DataViewerComponent;
pub use dataset_choice::draw_dataset_choice;
pub use filter_builder::FilterBuilderComponent;
pub use help_dialog::HelpDialog;
pub use indicator::draw_busy_indicator;
pub use layout::{calculate_main_layout, centered_popup};
pub use setup::SetupComponent;
pub use sidebar::SidebarComponent;
pub use splash::SplashComponent;
pub use summary_panel::{home_lines, summary_lines};
pub use upload::UploadPage;
