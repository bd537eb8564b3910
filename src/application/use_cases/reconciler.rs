// ============================================================
// CROSS-FILE RECONCILER
// ============================================================
// Duplicate and orphan detection across the whole batch

use std::collections::{HashMap, HashSet};

use crate::domain::batch::{ActionRecordRef, DuplicateEntry, OrphanFinding, Severity};
use crate::domain::batch_config::BatchConfig;

/// Batch-wide consistency checks over the workflow action log
///
/// Both checks run once, after every file has been processed, so that
/// references in early files can be satisfied by ids loaded later.
pub struct CrossFileReconciler;

impl CrossFileReconciler {
    /// Repeated applicationIds within the action log
    ///
    /// An id seen N times yields N-1 entries, one per repeat occurrence,
    /// each carrying the occurrence count at that point. First sightings
    /// are not duplicates.
    pub fn detect_duplicates(actions: &[ActionRecordRef]) -> Vec<DuplicateEntry> {
        let mut seen: HashMap<i64, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for action in actions {
            let count = seen.entry(action.application_id).or_insert(0);
            *count += 1;
            if *count > 1 {
                duplicates.push(DuplicateEntry {
                    application_id: action.application_id,
                    occurrence_count: *count,
                    file: action.file.clone(),
                    row: action.row,
                    severity: Severity::High,
                });
            }
        }

        duplicates
    }

    /// Application ids referenced by actions but absent from the details
    ///
    /// Reported as one aggregate finding with a capped id sample. Each
    /// missing id is flagged exactly once no matter how many action
    /// records reference it. Skipped entirely when no detail file was
    /// uploaded, since then every action would count as orphaned.
    pub fn detect_orphans(
        actions: &[ActionRecordRef],
        detail_ids: &HashSet<i64>,
        config: &BatchConfig,
    ) -> Option<OrphanFinding> {
        if detail_ids.is_empty() {
            return None;
        }

        let mut orphan_ids: Vec<i64> = Vec::new();
        let mut seen: HashSet<i64> = HashSet::new();

        for action in actions {
            if !detail_ids.contains(&action.application_id) && seen.insert(action.application_id) {
                if orphan_ids.len() < config.max_orphan_samples {
                    orphan_ids.push(action.application_id);
                }
            }
        }

        if seen.is_empty() {
            None
        } else {
            Some(OrphanFinding {
                count: seen.len(),
                ids: orphan_ids,
            })
        }
    }
}
