// ============================================================
// BATCH CONFIGURATION
// ============================================================
// Limits and presentation budgets for batch processing

use serde::{Deserialize, Serialize};

/// Configuration for batch processing
///
/// The file-count and file-size limits are caller-enforced
/// preconditions at the upload boundary; exceeding them here degrades
/// to a batch warning rather than a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum files expected per batch (default: 37)
    pub max_files: usize,

    /// Maximum size per file in bytes (default: 10 MB)
    pub max_file_size_bytes: u64,

    /// Sample details kept per issue (default: 5)
    pub max_issue_samples: usize,

    /// Sample ids kept in the orphan-records issue (default: 10)
    pub max_orphan_samples: usize,

    /// Entries kept in the department/district breakdowns (default: 10)
    pub top_breakdown_entries: usize,

    /// Character budget for department names in the breakdown (default: 30)
    pub department_name_budget: usize,

    /// Character budget for district names in the breakdown (default: 20)
    pub district_name_budget: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_files: 37,
            max_file_size_bytes: 10 * 1024 * 1024,
            max_issue_samples: 5,
            max_orphan_samples: 10,
            top_breakdown_entries: 10,
            department_name_budget: 30,
            district_name_budget: 20,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_files == 0 {
            return Err("max_files must be > 0".to_string());
        }
        if self.max_file_size_bytes == 0 {
            return Err("max_file_size_bytes must be > 0".to_string());
        }
        if self.max_issue_samples == 0 {
            return Err("max_issue_samples must be > 0".to_string());
        }
        if self.max_orphan_samples == 0 {
            return Err("max_orphan_samples must be > 0".to_string());
        }
        if self.top_breakdown_entries == 0 {
            return Err("top_breakdown_entries must be > 0".to_string());
        }
        Ok(())
    }
}
