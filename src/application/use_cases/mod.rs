pub mod aggregator;
pub mod batch_processor;
pub mod classifier;
pub mod header_validator;
pub mod processors;
pub mod reconciler;
pub mod status;
