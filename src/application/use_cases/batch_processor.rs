// ============================================================
// BATCH PROCESSOR
// ============================================================
// Orchestrates one upload batch from raw bytes to the final report

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::use_cases::aggregator::MetricsAggregator;
use crate::application::use_cases::classifier::FileClassifier;
use crate::application::use_cases::header_validator::HeaderValidator;
use crate::application::use_cases::processors::process_record;
use crate::application::use_cases::reconciler::CrossFileReconciler;
use crate::application::use_cases::status::{status_bucket, StatusBucket};
use crate::domain::batch::{
    ActionRecordRef, BatchAccumulator, BatchReport, ProcessingFailure, ProcessingResult,
    ValidationFailure,
};
use crate::domain::batch_config::BatchConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::record::{CellValue, Record};
use crate::domain::registry::{FileCategory, RegistryEntry};
use crate::infrastructure::spreadsheet::SpreadsheetReader;

/// One uploaded file, name plus raw bytes
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }
}

/// Drives a whole batch through decode, classify, validate and aggregate
///
/// Files are processed strictly in upload order, one after another.
/// Master-data files are expected early in the batch; when they are
/// not, reference checks against the still-empty maps are skipped
/// rather than failed. Per-file failures degrade to result errors;
/// only a broken configuration fails the batch itself.
pub struct BatchProcessor {
    reader: SpreadsheetReader,
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self::with_config(BatchConfig::default())
    }

    pub fn with_config(config: BatchConfig) -> Self {
        Self {
            reader: SpreadsheetReader::new(),
            config,
        }
    }

    /// Process every file and build the aggregate report
    pub fn process_batch(&self, files: &[UploadedFile]) -> Result<BatchReport> {
        self.config
            .validate()
            .map_err(AppError::ValidationError)?;

        info!("Processing batch of {} files", files.len());

        let mut batch_warnings = Vec::new();
        if files.len() > self.config.max_files {
            warn!(
                "Batch has {} files, limit is {}",
                files.len(),
                self.config.max_files
            );
            batch_warnings.push(format!(
                "Batch contains {} files, exceeding the expected maximum of {}",
                files.len(),
                self.config.max_files
            ));
        }

        let mut acc = BatchAccumulator::default();
        let mut results = Vec::with_capacity(files.len());

        for file in files {
            let entry = FileClassifier::classify(&file.name);
            results.push(self.process_file(file, entry, &mut acc));
        }

        let duplicates = CrossFileReconciler::detect_duplicates(&acc.actions);
        let orphans =
            CrossFileReconciler::detect_orphans(&acc.actions, &acc.detail_ids, &self.config);
        if acc.detail_ids.is_empty() && !acc.actions.is_empty() {
            batch_warnings.push(
                "Orphan check skipped: batch has action records but no application details"
                    .to_string(),
            );
        }

        let metrics = MetricsAggregator::build_metrics(&acc, &duplicates);
        let issues =
            MetricsAggregator::build_issues(&acc, &duplicates, orphans.as_ref(), &self.config);

        info!(
            "Batch complete: {} records, {} applications, health {:.1}",
            metrics.total_records, metrics.total_applications, metrics.data_health_score
        );

        Ok(BatchReport {
            status_breakdown: MetricsAggregator::status_breakdown(&acc),
            department_breakdown: MetricsAggregator::department_breakdown(&acc, &self.config),
            district_breakdown: MetricsAggregator::district_breakdown(&acc, &self.config),
            monthly_series: MetricsAggregator::monthly_series(&acc),
            results,
            metrics,
            issues,
            warnings: batch_warnings,
        })
    }

    fn process_file(
        &self,
        file: &UploadedFile,
        entry: Option<&RegistryEntry>,
        acc: &mut BatchAccumulator,
    ) -> ProcessingResult {
        let file_type = entry.map_or("unknown", |e| e.category.as_str());
        let mut result = ProcessingResult::new(&file.name, file_type);
        let started = Instant::now();

        debug!("Processing {} as {}", file.name, file_type);

        if file.bytes.len() as u64 > self.config.max_file_size_bytes {
            let limit_mb = self.config.max_file_size_bytes / (1024 * 1024);
            let message = format!("File exceeds the {} MB size limit", limit_mb);
            result.errors.push(message.clone());
            acc.processing_failures.push(ProcessingFailure {
                file: file.name.clone(),
                error: message,
            });
            result.processing_time_ms = started.elapsed().as_millis() as u64;
            return result;
        }

        let outcome = match self.reader.read_tables(&file.name, &file.bytes) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Failed to decode {}: {}", file.name, e);
                result.errors.push(e.to_string());
                acc.processing_failures.push(ProcessingFailure {
                    file: file.name.clone(),
                    error: e.to_string(),
                });
                result.processing_time_ms = started.elapsed().as_millis() as u64;
                return result;
            }
        };
        result.warnings.extend(outcome.warnings);

        for table in &outcome.tables {
            if let Some(entry) = entry {
                if let Some(warning) = HeaderValidator::validate(&table.headers, entry) {
                    result.warnings.push(warning);
                }
            }

            for (index, row) in table.rows.iter().enumerate() {
                // Display row: data index + header row + 1-based offset
                let row_number = index + 2;
                let record = Record::from_row(&table.headers, row);

                result.records_processed += 1;
                acc.total_records += 1;

                match process_record(record, entry, &acc.master, &mut result, row_number) {
                    Some(record) => {
                        result.valid_records += 1;
                        if let Some(entry) = entry {
                            accumulate(acc, entry, &record, &file.name, row_number);
                        }
                        result.data.push(record);
                    }
                    None => {
                        result.invalid_records += 1;
                        // The rejection reason is the warning just pushed
                        let prefix = format!("Row {}: ", row_number);
                        let message = result
                            .warnings
                            .last()
                            .map(|w| w.strip_prefix(&prefix).unwrap_or(w).to_string())
                            .unwrap_or_else(|| "Validation failed".to_string());
                        acc.validation_failures.push(ValidationFailure {
                            file: file.name.clone(),
                            row: row_number,
                            message,
                        });
                    }
                }
            }
        }

        result.processing_time_ms = started.elapsed().as_millis() as u64;
        debug!(
            "{}: {} valid, {} invalid, {} warnings",
            file.name,
            result.valid_records,
            result.invalid_records,
            result.warnings.len()
        );
        result
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold one accepted record into the batch-wide state
fn accumulate(
    acc: &mut BatchAccumulator,
    entry: &RegistryEntry,
    record: &Record,
    file_name: &str,
    row_number: usize,
) {
    match entry.category {
        FileCategory::ApplicationCore => {
            if let Some(id) = record.get("applicationId").and_then(CellValue::as_i64) {
                acc.detail_ids.insert(id);
            }

            // Statusless applications still count, under "Unknown"
            let status = record
                .get_display("applicationStatusDescription")
                .unwrap_or_else(|| "Unknown".to_string());
            *acc.status_counts.entry(status.clone()).or_insert(0) += 1;

            if let Some(dt) = record.get("creationTimeStamp").and_then(CellValue::as_datetime) {
                let month = dt.format("%Y-%m").to_string();
                let counts = acc.monthly.entry(month).or_default();
                counts.total += 1;
                match status_bucket(&status) {
                    Some(StatusBucket::Approved) => counts.approved += 1,
                    Some(StatusBucket::Pending) => counts.pending += 1,
                    Some(StatusBucket::Rejected) => counts.rejected += 1,
                    None => {}
                }
            }

            let department = record
                .get_display("baseDepartmentName")
                .unwrap_or_else(|| "Unknown".to_string());
            *acc.department_counts.entry(department).or_insert(0) += 1;
            let district = record
                .get_display("applicantDistrictName")
                .unwrap_or_else(|| "Unknown".to_string());
            *acc.district_counts.entry(district).or_insert(0) += 1;

            acc.applications.push(record.clone());
        }
        FileCategory::Workflow if entry.key == "applicationaction" => {
            if let Some(id) = record.get("applicationId").and_then(CellValue::as_i64) {
                acc.actions.push(ActionRecordRef {
                    application_id: id,
                    file: file_name.to_string(),
                    row: row_number,
                });
            }
        }
        FileCategory::MasterData => harvest_master(acc, entry, record),
        _ => {}
    }
}

/// Pull id-to-name pairs out of master data rows
///
/// Local-language names are preferred over English ones because the
/// dashboard renders in the local language.
fn harvest_master(acc: &mut BatchAccumulator, entry: &RegistryEntry, record: &Record) {
    let (map, id_fields, name_fields): (_, &[&str], &[&str]) = match entry.key {
        "basedepartment" => (
            &mut acc.master.departments,
            &["baseDepartmentId", "departmentId", "id", "Id", "ID"],
            &[
                "baseDepartmentNameLocal",
                "baseDepartmentName",
                "departmentName",
                "name",
            ],
        ),
        "district" => (
            &mut acc.master.districts,
            &["districtId", "id", "Id", "ID"],
            &["districtNameLocal", "districtName", "name"],
        ),
        "applicationcategorymaster" => (
            &mut acc.master.categories,
            &["categoryId", "id", "Id", "ID"],
            &["categoryName", "categoryCode", "name"],
        ),
        _ => return,
    };

    let id = id_fields.iter().find_map(|f| record.get_display(f));
    let name = name_fields.iter().find_map(|f| record.get_display(f));

    if let (Some(id), Some(name)) = (id, name) {
        map.insert(id, name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> UploadedFile {
        UploadedFile::new(name, content.as_bytes().to_vec())
    }

    fn details_csv() -> UploadedFile {
        file(
            "applicationdetails.csv",
            "applicationId,applicantName,applicationStatusDescription,creationTimeStamp,baseDepartmentId,baseDepartmentName,categoryCode,applicantDistrictName\n\
             101,Asha,approved,2024-01-15,1,स्वास्थ्य विभाग,C1,रायपुर\n\
             102,Ravi,लंबित,2024-02-20,1,स्वास्थ्य विभाग,C2,बिलासपुर\n\
             103,Meena,rejected,2024-02-25,1,स्वास्थ्य विभाग,C1,रायपुर",
        )
    }

    fn actions_csv() -> UploadedFile {
        file(
            "applicationaction.csv",
            "applicationId,actionDetail,actionDate,actionBy\n\
             101,Forwarded,2024-01-16,officer1\n\
             101,Approved,2024-01-20,officer2\n\
             999,Forwarded,2024-03-01,officer1",
        )
    }

    fn department_csv() -> UploadedFile {
        file(
            "basedepartment.csv",
            "baseDepartmentId,baseDepartmentName,baseDepartmentNameLocal\n\
             1,Health Department,स्वास्थ्य विभाग",
        )
    }

    #[test]
    fn test_full_batch_flow() {
        let files = vec![department_csv(), details_csv(), actions_csv()];

        let report = BatchProcessor::new().process_batch(&files).unwrap();

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.metrics.total_records, 7);
        assert_eq!(report.metrics.total_applications, 3);
        assert_eq!(report.metrics.approved_applications, 1);
        assert_eq!(report.metrics.pending_applications, 1);
        assert_eq!(report.metrics.rejected_applications, 1);
        assert_eq!(report.metrics.total_departments, 1);
        assert_eq!(report.metrics.duplicate_records, 1);
        assert_eq!(report.metrics.error_count, 0);

        // (7 - 1 - 0) / 7 * 100
        assert!((report.metrics.data_health_score - 600.0 / 7.0).abs() < 0.01);

        let detail_result = report
            .results
            .iter()
            .find(|r| r.file_name == "applicationdetails.csv")
            .unwrap();
        assert!(detail_result
            .warnings
            .iter()
            .all(|w| !w.contains("Department ID")));
        assert_eq!(detail_result.valid_records, 3);

        assert_eq!(report.status_breakdown.len(), 3);
        assert_eq!(report.monthly_series.len(), 2);
        assert_eq!(report.monthly_series[0].month, "2024-01");
        assert_eq!(report.monthly_series[1].total, 2);

        assert!(report.department_breakdown[0].name.contains("स्वास्थ्य"));
        assert_eq!(report.department_breakdown[0].applications, 3);
        assert_eq!(report.district_breakdown.len(), 2);

        let duplicate_issue = report
            .issues
            .iter()
            .find(|i| i.id == "duplicate-records")
            .unwrap();
        assert_eq!(duplicate_issue.count, 1);

        let orphan_issue = report.issues.iter().find(|i| i.id == "orphan-records").unwrap();
        assert_eq!(orphan_issue.count, 1);
        assert!(orphan_issue.details[0].contains("999"));
    }

    #[test]
    fn test_master_reference_checks_follow_upload_order() {
        // Master data after the files that would use it: the reference
        // check is skipped against the still-empty map, not failed
        let report = BatchProcessor::new()
            .process_batch(&[details_csv(), department_csv()])
            .unwrap();
        assert!(report
            .results
            .iter()
            .flat_map(|r| &r.warnings)
            .all(|w| !w.contains("Department ID")));

        // Master data first: an unknown department id now warns
        let bad_reference = file(
            "applicationdetails.csv",
            "applicationId,applicantName,applicationStatusDescription,creationTimeStamp,baseDepartmentId,baseDepartmentName,categoryCode,applicantDistrictName\n\
             201,Sita,approved,2024-01-10,99,Unknown Dept,C1,रायपुर",
        );
        let report = BatchProcessor::new()
            .process_batch(&[department_csv(), bad_reference])
            .unwrap();
        assert!(report
            .results
            .iter()
            .flat_map(|r| &r.warnings)
            .any(|w| w.contains("Department ID 99 not found")));
    }

    #[test]
    fn test_statusless_application_still_counted() {
        let no_status = file(
            "applicationdetails.csv",
            "applicationId,applicantName,creationTimeStamp\n\
             301,Sita,2024-05-10",
        );

        let report = BatchProcessor::new().process_batch(&[no_status]).unwrap();

        assert_eq!(report.results[0].valid_records, 1);
        assert_eq!(report.monthly_series.len(), 1);
        assert_eq!(report.monthly_series[0].month, "2024-05");
        assert_eq!(report.monthly_series[0].total, 1);

        let unknown = report
            .status_breakdown
            .iter()
            .find(|s| s.name == "Unknown")
            .unwrap();
        assert_eq!(unknown.value, 1);
        assert_eq!(report.department_breakdown[0].name, "Unknown");
        assert_eq!(report.district_breakdown[0].name, "Unknown");
    }

    #[test]
    fn test_actions_without_details_warn_about_skipped_orphan_check() {
        let report = BatchProcessor::new().process_batch(&[actions_csv()]).unwrap();

        assert!(report.issues.iter().all(|i| i.id != "orphan-records"));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("Orphan check skipped")));

        // A batch with details gets a real check, not the warning
        let report = BatchProcessor::new()
            .process_batch(&[details_csv(), actions_csv()])
            .unwrap();
        assert!(report.warnings.iter().all(|w| !w.contains("Orphan check")));
    }

    #[test]
    fn test_invalid_rows_become_validation_failures() {
        let broken = file(
            "applicationdetails.csv",
            "applicationId,applicantName,applicationStatusDescription,creationTimeStamp\n\
             101,Asha,approved,2024-01-15\n\
             ,Ravi,pending,2024-02-20",
        );

        let report = BatchProcessor::new().process_batch(&[broken]).unwrap();

        let result = &report.results[0];
        assert_eq!(result.records_processed, 2);
        assert_eq!(result.valid_records, 1);
        assert_eq!(result.invalid_records, 1);

        let issue = report
            .issues
            .iter()
            .find(|i| i.id == "validation-failures")
            .unwrap();
        assert_eq!(issue.count, 1);
        assert!(issue.details[0].contains("row 3"));
        assert_eq!(report.metrics.error_count, 1);
    }

    #[test]
    fn test_undecodable_file_degrades_to_result_error() {
        let files = vec![
            UploadedFile::new("broken.xlsx", b"not a workbook".to_vec()),
            details_csv(),
        ];

        let report = BatchProcessor::new().process_batch(&files).unwrap();

        let broken = report
            .results
            .iter()
            .find(|r| r.file_name == "broken.xlsx")
            .unwrap();
        assert!(!broken.errors.is_empty());
        assert_eq!(broken.records_processed, 0);

        // The rest of the batch still processed
        assert_eq!(report.metrics.total_applications, 3);
        assert!(report
            .issues
            .iter()
            .any(|i| i.id == "processing-failures"));
    }

    #[test]
    fn test_oversized_file_skipped_with_error() {
        let config = BatchConfig {
            max_file_size_bytes: 16,
            ..Default::default()
        };

        let report = BatchProcessor::with_config(config)
            .process_batch(&[details_csv()])
            .unwrap();

        let result = &report.results[0];
        assert!(result.errors[0].contains("size limit"));
        assert_eq!(result.records_processed, 0);
        assert!(report.issues.iter().any(|i| i.id == "processing-failures"));
    }

    #[test]
    fn test_file_count_limit_degrades_to_warning() {
        let config = BatchConfig {
            max_files: 1,
            ..Default::default()
        };

        let report = BatchProcessor::with_config(config)
            .process_batch(&[details_csv(), department_csv()])
            .unwrap();

        assert_eq!(report.results.len(), 2);
        assert!(report.warnings[0].contains("exceeding"));
    }

    #[test]
    fn test_unknown_file_processed_generically() {
        let unknown = file("randomdata.csv", "col1,col2\nfoo,bar");

        let report = BatchProcessor::new().process_batch(&[unknown]).unwrap();

        let result = &report.results[0];
        assert_eq!(result.file_type, "unknown");
        assert_eq!(result.valid_records, 1);
        assert_eq!(report.metrics.total_applications, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BatchConfig {
            max_files: 0,
            ..Default::default()
        };

        let outcome = BatchProcessor::with_config(config).process_batch(&[]);
        assert!(outcome.is_err());
    }

    #[test]
    fn test_empty_batch_scores_zero() {
        let report = BatchProcessor::new().process_batch(&[]).unwrap();
        assert_eq!(report.metrics.total_records, 0);
        assert_eq!(report.metrics.data_health_score, 0.0);
        assert!(report.issues.is_empty());
    }
}
