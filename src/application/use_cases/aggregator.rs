// ============================================================
// METRICS AGGREGATOR
// ============================================================
// Derive dashboard metrics, chart data and the issue list per batch

use crate::domain::batch::{
    BatchAccumulator, BreakdownEntry, DashboardMetrics, DuplicateEntry, Issue, MonthlySeriesEntry,
    OrphanFinding, Severity, StatusSlice,
};
use crate::domain::batch_config::BatchConfig;

/// Aggregate counts, breakdowns and issues derived from one batch
///
/// Everything here is recomputed from scratch for each batch; nothing
/// carries over from previous uploads.
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Headline counts plus the batch health score
    pub fn build_metrics(
        acc: &BatchAccumulator,
        duplicates: &[DuplicateEntry],
    ) -> DashboardMetrics {
        let approved = Self::bucket_total(acc, &["स्वीकृत", "approved"]);
        let pending = Self::bucket_total(acc, &["लंबित", "pending"]);
        let rejected = Self::bucket_total(acc, &["निराकृत", "rejected"]);

        let total_departments = if acc.master.departments.is_empty() {
            acc.department_counts.len()
        } else {
            acc.master.departments.len()
        };
        let total_districts = if acc.master.districts.is_empty() {
            acc.district_counts.len()
        } else {
            acc.master.districts.len()
        };

        let error_count = acc.validation_failures.len() + acc.processing_failures.len();

        DashboardMetrics {
            total_applications: acc.applications.len(),
            approved_applications: approved,
            pending_applications: pending,
            rejected_applications: rejected,
            total_departments,
            total_districts,
            total_records: acc.total_records,
            duplicate_records: duplicates.len(),
            error_count,
            data_health_score: Self::health_score(acc.total_records, duplicates.len(), error_count),
        }
    }

    /// 0-100 share of records that are neither duplicated nor failed
    ///
    /// Empty batches score 0, not 100: no data is not healthy data.
    pub fn health_score(total_records: usize, duplicates: usize, errors: usize) -> f64 {
        if total_records == 0 {
            return 0.0;
        }
        let clean = total_records as f64 - duplicates as f64 - errors as f64;
        (clean / total_records as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Status pie slices, largest first
    pub fn status_breakdown(acc: &BatchAccumulator) -> Vec<StatusSlice> {
        let mut slices: Vec<StatusSlice> = acc
            .status_counts
            .iter()
            .map(|(name, value)| StatusSlice {
                name: name.clone(),
                value: *value,
            })
            .collect();
        slices.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
        slices
    }

    /// Top departments by application count, names shortened for display
    pub fn department_breakdown(acc: &BatchAccumulator, config: &BatchConfig) -> Vec<BreakdownEntry> {
        Self::top_breakdown(
            &acc.department_counts,
            config.top_breakdown_entries,
            config.department_name_budget,
        )
    }

    /// Top districts by application count, names shortened for display
    pub fn district_breakdown(acc: &BatchAccumulator, config: &BatchConfig) -> Vec<BreakdownEntry> {
        Self::top_breakdown(
            &acc.district_counts,
            config.top_breakdown_entries,
            config.district_name_budget,
        )
    }

    /// Monthly totals in chronological order
    pub fn monthly_series(acc: &BatchAccumulator) -> Vec<MonthlySeriesEntry> {
        acc.monthly
            .iter()
            .map(|(month, counts)| MonthlySeriesEntry {
                month: month.clone(),
                total: counts.total,
                approved: counts.approved,
                pending: counts.pending,
                rejected: counts.rejected,
            })
            .collect()
    }

    /// Ranked issue list with capped detail samples
    pub fn build_issues(
        acc: &BatchAccumulator,
        duplicates: &[DuplicateEntry],
        orphans: Option<&OrphanFinding>,
        config: &BatchConfig,
    ) -> Vec<Issue> {
        let mut issues = Vec::new();

        if !duplicates.is_empty() {
            let details = duplicates
                .iter()
                .take(config.max_issue_samples)
                .map(|d| {
                    format!(
                        "ID {} seen {} times ({}, row {})",
                        d.application_id, d.occurrence_count, d.file, d.row
                    )
                })
                .collect();
            issues.push(Issue {
                id: "duplicate-records".to_string(),
                issue_type: "Duplicate Records".to_string(),
                count: duplicates.len(),
                severity: Severity::Critical,
                description: format!(
                    "{} duplicate application references found in the action log",
                    duplicates.len()
                ),
                details,
            });
        }

        if !acc.validation_failures.is_empty() {
            let details = acc
                .validation_failures
                .iter()
                .take(config.max_issue_samples)
                .map(|f| format!("{} row {}: {}", f.file, f.row, f.message))
                .collect();
            issues.push(Issue {
                id: "validation-failures".to_string(),
                issue_type: "Validation Failures".to_string(),
                count: acc.validation_failures.len(),
                severity: Severity::High,
                description: format!(
                    "{} records rejected by mandatory-field checks",
                    acc.validation_failures.len()
                ),
                details,
            });
        }

        if let Some(orphans) = orphans {
            let details = orphans
                .ids
                .iter()
                .map(|id| format!("Application ID {}", id))
                .collect();
            issues.push(Issue {
                id: "orphan-records".to_string(),
                issue_type: "Orphan Records".to_string(),
                count: orphans.count,
                severity: Severity::High,
                description: format!(
                    "{} application ids referenced by actions are missing from the batch",
                    orphans.count
                ),
                details,
            });
        }

        if !acc.processing_failures.is_empty() {
            let details = acc
                .processing_failures
                .iter()
                .take(config.max_issue_samples)
                .map(|f| format!("{}: {}", f.file, f.error))
                .collect();
            issues.push(Issue {
                id: "processing-failures".to_string(),
                issue_type: "Processing Failures".to_string(),
                count: acc.processing_failures.len(),
                severity: Severity::Medium,
                description: format!(
                    "{} files could not be processed",
                    acc.processing_failures.len()
                ),
                details,
            });
        }

        issues
    }

    fn bucket_total(acc: &BatchAccumulator, tokens: &[&str]) -> usize {
        acc.status_counts
            .iter()
            .filter(|(status, _)| {
                let status = status.to_lowercase();
                tokens.iter().any(|t| status.contains(t))
            })
            .map(|(_, count)| count)
            .sum()
    }

    fn top_breakdown(
        counts: &std::collections::HashMap<String, usize>,
        top: usize,
        name_budget: usize,
    ) -> Vec<BreakdownEntry> {
        let mut entries: Vec<(&String, &usize)> = counts.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        entries
            .into_iter()
            .take(top)
            .map(|(name, count)| BreakdownEntry {
                name: Self::shorten(name, name_budget),
                applications: *count,
            })
            .collect()
    }

    // Names are Devanagari text, so the cut must be on characters
    fn shorten(name: &str, budget: usize) -> String {
        if name.chars().count() <= budget {
            name.to_string()
        } else {
            let short: String = name.chars().take(budget).collect();
            format!("{}...", short)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::{ProcessingFailure, ValidationFailure};
    use crate::domain::record::Record;

    fn accumulator() -> BatchAccumulator {
        BatchAccumulator::default()
    }

    fn duplicate(id: i64, occurrence: usize) -> DuplicateEntry {
        DuplicateEntry {
            application_id: id,
            occurrence_count: occurrence,
            file: "applicationaction.xlsx".to_string(),
            row: 5,
            severity: Severity::High,
        }
    }

    #[test]
    fn test_health_score_bounds() {
        assert_eq!(MetricsAggregator::health_score(0, 0, 0), 0.0);
        assert_eq!(MetricsAggregator::health_score(100, 0, 0), 100.0);
        assert_eq!(MetricsAggregator::health_score(100, 5, 5), 90.0);
        // More problems than records still floors at 0
        assert_eq!(MetricsAggregator::health_score(10, 20, 20), 0.0);
    }

    #[test]
    fn test_metrics_status_buckets() {
        let mut acc = accumulator();
        acc.applications.push(Record::new());
        acc.applications.push(Record::new());
        acc.applications.push(Record::new());
        acc.status_counts
            .insert("Approved (स्वीकृत)".to_string(), 2);
        acc.status_counts.insert("Pending (लंबित)".to_string(), 1);
        acc.total_records = 3;

        let metrics = MetricsAggregator::build_metrics(&acc, &[]);
        assert_eq!(metrics.total_applications, 3);
        assert_eq!(metrics.approved_applications, 2);
        assert_eq!(metrics.pending_applications, 1);
        assert_eq!(metrics.rejected_applications, 0);
        assert_eq!(metrics.data_health_score, 100.0);
    }

    #[test]
    fn test_department_total_prefers_master_data() {
        let mut acc = accumulator();
        acc.department_counts.insert("Health".to_string(), 3);
        acc.department_counts.insert("Revenue".to_string(), 1);

        let metrics = MetricsAggregator::build_metrics(&acc, &[]);
        assert_eq!(metrics.total_departments, 2);

        for id in 0..5 {
            acc.master
                .departments
                .insert(id.to_string(), format!("Dept {}", id));
        }
        let metrics = MetricsAggregator::build_metrics(&acc, &[]);
        assert_eq!(metrics.total_departments, 5);
    }

    #[test]
    fn test_breakdowns_sorted_capped_and_shortened() {
        let mut acc = accumulator();
        let config = BatchConfig::default();

        for i in 0..15 {
            acc.department_counts.insert(format!("Dept {}", i), i);
        }
        let long_name = "जल संसाधन विभाग छत्तीसगढ़ शासन रायपुर मुख्यालय".to_string();
        assert!(long_name.chars().count() > config.department_name_budget);
        acc.department_counts.insert(long_name.clone(), 100);

        let breakdown = MetricsAggregator::department_breakdown(&acc, &config);
        assert_eq!(breakdown.len(), config.top_breakdown_entries);
        assert_eq!(breakdown[0].applications, 100);
        assert!(breakdown[0].name.ends_with("..."));
        assert_eq!(
            breakdown[0].name.chars().count(),
            config.department_name_budget + 3
        );
        assert_eq!(breakdown[1].applications, 14);
    }

    #[test]
    fn test_status_breakdown_sorted_by_count() {
        let mut acc = accumulator();
        acc.status_counts.insert("Pending (लंबित)".to_string(), 1);
        acc.status_counts
            .insert("Approved (स्वीकृत)".to_string(), 4);

        let slices = MetricsAggregator::status_breakdown(&acc);
        assert_eq!(slices[0].name, "Approved (स्वीकृत)");
        assert_eq!(slices[0].value, 4);
    }

    #[test]
    fn test_issue_list_ordering_and_samples() {
        let mut acc = accumulator();
        let config = BatchConfig::default();

        let duplicates: Vec<DuplicateEntry> = (0..8).map(|i| duplicate(i, 2)).collect();
        for row in 0..3 {
            acc.validation_failures.push(ValidationFailure {
                file: "applicationdetails.xlsx".to_string(),
                row,
                message: "Missing or invalid applicationId".to_string(),
            });
        }
        acc.processing_failures.push(ProcessingFailure {
            file: "broken.xlsx".to_string(),
            error: "Failed to open spreadsheet".to_string(),
        });
        let orphans = OrphanFinding {
            count: 4,
            ids: vec![900, 901],
        };

        let issues = MetricsAggregator::build_issues(&acc, &duplicates, Some(&orphans), &config);

        assert_eq!(issues.len(), 4);
        assert_eq!(issues[0].id, "duplicate-records");
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].count, 8);
        assert_eq!(issues[0].details.len(), config.max_issue_samples);
        assert_eq!(issues[1].id, "validation-failures");
        assert_eq!(issues[1].severity, Severity::High);
        assert_eq!(issues[2].id, "orphan-records");
        assert_eq!(issues[2].count, 4);
        assert_eq!(issues[3].id, "processing-failures");
        assert_eq!(issues[3].severity, Severity::Medium);
    }

    #[test]
    fn test_monthly_series_chronological() {
        let mut acc = accumulator();
        acc.monthly.insert(
            "2024-03".to_string(),
            crate::domain::batch::MonthlyCounts {
                total: 2,
                approved: 1,
                pending: 1,
                rejected: 0,
            },
        );
        acc.monthly.insert(
            "2024-01".to_string(),
            crate::domain::batch::MonthlyCounts {
                total: 1,
                approved: 0,
                pending: 0,
                rejected: 1,
            },
        );

        let series = MetricsAggregator::monthly_series(&acc);
        assert_eq!(series[0].month, "2024-01");
        assert_eq!(series[1].month, "2024-03");
        assert_eq!(series[1].total, 2);
    }
}
