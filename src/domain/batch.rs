// ============================================================
// BATCH TYPES
// ============================================================
// Per-file results, cross-file findings and the aggregate report

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use super::record::Record;

/// Result of processing one uploaded file
///
/// Created at the start of file processing, accumulated during row
/// processing, finalized and returned. Every record in `data` has
/// passed its category's mandatory-field check, so
/// `valid_records + invalid_records == records_processed` always holds
/// for the rows actually reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub file_name: String,
    pub file_type: String,
    pub records_processed: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub data: Vec<Record>,
    pub processing_time_ms: u64,
}

impl ProcessingResult {
    pub fn new(file_name: &str, file_type: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            file_type: file_type.to_string(),
            records_processed: 0,
            valid_records: 0,
            invalid_records: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            data: Vec::new(),
            processing_time_ms: 0,
        }
    }
}

/// Severity tier for batch-level findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "Critical"),
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
        }
    }
}

/// A ranked data-quality issue, regenerated per batch from aggregate counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub issue_type: String,
    pub count: usize,
    pub severity: Severity,
    pub description: String,
    pub details: Vec<String>,
}

/// A repeated applicationId within the workflow action log
///
/// One entry is recorded per repeat occurrence, so an id seen N times
/// yields N-1 entries with a running occurrence count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub application_id: i64,
    pub occurrence_count: usize,
    pub file: String,
    pub row: usize,
    pub severity: Severity,
}

/// Application ids referenced by action records but absent from the
/// batch, each flagged once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanFinding {
    pub count: usize,
    pub ids: Vec<i64>,
}

/// A row rejected by its category's mandatory-field check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub file: String,
    pub row: usize,
    pub message: String,
}

/// A file that could not be decoded at all
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingFailure {
    pub file: String,
    pub error: String,
}

/// Reference to one workflow action record, kept for cross-file checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecordRef {
    pub application_id: i64,
    pub file: String,
    pub row: usize,
}

/// Cross-batch reference context built from master-data files
///
/// Maps department/district/category identifiers to display names.
/// Built incrementally while the batch runs; consulted (not mutated)
/// by later application-core row validation. Lifetime is one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterData {
    pub departments: HashMap<String, String>,
    pub districts: HashMap<String, String>,
    pub categories: HashMap<String, String>,
}

impl MasterData {
    pub fn is_empty(&self) -> bool {
        self.departments.is_empty() && self.districts.is_empty() && self.categories.is_empty()
    }
}

/// Per-month application counts, keyed by "YYYY-MM"
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MonthlyCounts {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
}

/// One point of the monthly time series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySeriesEntry {
    pub month: String,
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
}

/// One slice of the status pie chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSlice {
    pub name: String,
    pub value: usize,
}

/// One bar of the department/district breakdown charts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub applications: usize,
}

/// Aggregate counts derived once per batch, overwritten wholesale on
/// each new batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_applications: usize,
    pub approved_applications: usize,
    pub pending_applications: usize,
    pub rejected_applications: usize,
    pub total_departments: usize,
    pub total_districts: usize,
    pub total_records: usize,
    pub duplicate_records: usize,
    pub error_count: usize,
    /// 0-100 measure of batch data quality
    pub data_health_score: f64,
}

/// The complete output of one batch: per-file results plus the
/// aggregate consumed by the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<ProcessingResult>,
    pub metrics: DashboardMetrics,
    pub status_breakdown: Vec<StatusSlice>,
    pub department_breakdown: Vec<BreakdownEntry>,
    pub district_breakdown: Vec<BreakdownEntry>,
    pub monthly_series: Vec<MonthlySeriesEntry>,
    pub issues: Vec<Issue>,
    pub warnings: Vec<String>,
}

/// Mutable state shared across one batch
///
/// Files are processed strictly in upload order; master data
/// accumulated here is only visible to the files that follow it.
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    pub applications: Vec<Record>,
    pub actions: Vec<ActionRecordRef>,
    pub detail_ids: HashSet<i64>,
    pub master: MasterData,
    pub status_counts: HashMap<String, usize>,
    pub department_counts: HashMap<String, usize>,
    pub district_counts: HashMap<String, usize>,
    pub monthly: BTreeMap<String, MonthlyCounts>,
    pub validation_failures: Vec<ValidationFailure>,
    pub processing_failures: Vec<ProcessingFailure>,
    pub total_records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_data_empty() {
        let mut master = MasterData::default();
        assert!(master.is_empty());

        master.departments.insert("1".to_string(), "Health".to_string());
        assert!(!master.is_empty());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Critical.to_string(), "Critical");
        assert_eq!(Severity::Low.to_string(), "Low");
    }
}
