pub mod batch;
pub mod batch_config;
pub mod error;
pub mod record;
pub mod registry;
