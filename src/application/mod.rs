pub mod use_cases;

pub use use_cases::aggregator::MetricsAggregator;
pub use use_cases::batch_processor::{BatchProcessor, UploadedFile};
pub use use_cases::classifier::{FileClassifier, FileTypeInfo};
pub use use_cases::header_validator::HeaderValidator;
pub use use_cases::reconciler::CrossFileReconciler;
