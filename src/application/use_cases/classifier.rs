// ============================================================
// FILE CLASSIFIER
// ============================================================
// Match uploaded file names against the type registry

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::registry::{find_entry, RegistryEntry, FILE_TYPE_REGISTRY};

static EXTENSION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.(xlsx?|csv)$").unwrap());

/// Common misspellings and abbreviations seen in field exports,
/// checked via substring containment after registry matching fails
static ALIASES: &[(&str, &str)] = &[
    ("appdetails", "applicationdetails"),
    ("app_details", "applicationdetails"),
    ("application_details", "applicationdetails"),
    ("app_action", "applicationaction"),
    ("application_action", "applicationaction"),
    ("dept", "basedepartment"),
    ("department", "basedepartment"),
    ("user_login", "userlogin"),
    ("login", "userlogin"),
    ("sms_sent", "smssentdetail"),
    ("sms_details", "smssentdetail"),
    ("doc_store", "documentstore"),
    ("document", "documentstore"),
];

/// Human-readable classification of a file name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeInfo {
    pub file_type: String,
    pub description: String,
}

/// Heuristic file-name classifier
///
/// Matching order: exact key lookup, substring containment, alias
/// table. Substring ties are resolved longest-key-first so a name like
/// "applicationstatuslog" never lands on the shorter
/// "applicationstatus" entry.
pub struct FileClassifier;

impl FileClassifier {
    /// Best-matching registry entry for a file name, or None if unknown
    pub fn classify(file_name: &str) -> Option<&'static RegistryEntry> {
        let clean_name = Self::clean_name(file_name);
        if clean_name.is_empty() {
            return None;
        }

        if let Some(entry) = find_entry(&clean_name) {
            return Some(entry);
        }

        let mut best: Option<&'static RegistryEntry> = None;
        for entry in FILE_TYPE_REGISTRY {
            if clean_name.contains(entry.key) || entry.key.contains(clean_name.as_str()) {
                if best.map_or(true, |b| entry.key.len() > b.key.len()) {
                    best = Some(entry);
                }
            }
        }
        if best.is_some() {
            return best;
        }

        for (alias, canonical) in ALIASES {
            if clean_name.contains(alias) {
                return find_entry(canonical);
            }
        }

        None
    }

    /// Classification summary for display, degrading to unknown
    pub fn file_type_info(file_name: &str) -> FileTypeInfo {
        match Self::classify(file_name) {
            Some(entry) => FileTypeInfo {
                file_type: entry.category.to_string(),
                description: entry.description.to_string(),
            },
            None => FileTypeInfo {
                file_type: "unknown".to_string(),
                description: "Unknown file type".to_string(),
            },
        }
    }

    /// Strip the spreadsheet extension, lowercase and trim
    fn clean_name(file_name: &str) -> String {
        EXTENSION_PATTERN
            .replace(file_name, "")
            .to_lowercase()
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::FileCategory;

    #[test]
    fn test_exact_match() {
        let entry = FileClassifier::classify("applicationdetails.xlsx").unwrap();
        assert_eq!(entry.key, "applicationdetails");
        assert_eq!(entry.category, FileCategory::ApplicationCore);
    }

    #[test]
    fn test_extension_and_case_stripping() {
        let entry = FileClassifier::classify("BaseDepartment.XLS").unwrap();
        assert_eq!(entry.key, "basedepartment");

        let entry = FileClassifier::classify("district.csv").unwrap();
        assert_eq!(entry.key, "district");
    }

    #[test]
    fn test_substring_match() {
        let entry = FileClassifier::classify("applicationdetails_2024_export.xlsx").unwrap();
        assert_eq!(entry.key, "applicationdetails");
    }

    #[test]
    fn test_longest_key_wins_on_substring_ties() {
        // Contains both "applicationstatus" and "applicationstatuslog"
        let entry = FileClassifier::classify("applicationstatuslog_march.xlsx").unwrap();
        assert_eq!(entry.key, "applicationstatuslog");

        let entry = FileClassifier::classify("applicationdetailsonline_v2.xlsx").unwrap();
        assert_eq!(entry.key, "applicationdetailsonline");
    }

    #[test]
    fn test_alias_match() {
        let entry = FileClassifier::classify("dept_master.xlsx").unwrap();
        assert_eq!(entry.key, "basedepartment");

        let entry = FileClassifier::classify("app_details_export.xlsx").unwrap();
        assert_eq!(entry.key, "applicationdetails");
    }

    #[test]
    fn test_unknown_file_name() {
        assert!(FileClassifier::classify("randomdata.xlsx").is_none());
        assert!(FileClassifier::classify(".xlsx").is_none());
    }

    #[test]
    fn test_file_type_info_degrades_to_unknown() {
        let info = FileClassifier::file_type_info("randomdata.xlsx");
        assert_eq!(info.file_type, "unknown");

        let info = FileClassifier::file_type_info("userlogin.xlsx");
        assert_eq!(info.file_type, "user_management");
    }
}
