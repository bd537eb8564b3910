pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{BatchProcessor, FileClassifier, FileTypeInfo, UploadedFile};
pub use domain::batch::{BatchReport, DashboardMetrics, Issue, ProcessingResult};
pub use domain::batch_config::BatchConfig;
pub use domain::error::{AppError, Result};
pub use domain::registry::{supported_file_types, FileCategory, RegistryEntry};

/// Install the default log subscriber; safe to call more than once
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
}
