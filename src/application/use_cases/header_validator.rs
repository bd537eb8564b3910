// ============================================================
// HEADER VALIDATOR
// ============================================================
// Compare actual sheet headers against a type's expected headers

use crate::domain::registry::RegistryEntry;

/// Fuzzy expected-header check for classified file types
///
/// A header counts as present when any actual header case-insensitively
/// contains it or is contained by it. Missing headers are warnings, not
/// errors; unknown file types skip this check entirely.
pub struct HeaderValidator;

impl HeaderValidator {
    /// Warning message listing missing expected headers, if any
    pub fn validate(headers: &[String], entry: &RegistryEntry) -> Option<String> {
        let actual: Vec<String> = headers
            .iter()
            .filter(|h| !h.trim().is_empty())
            .map(|h| h.to_lowercase())
            .collect();

        let missing: Vec<&str> = entry
            .expected_headers
            .iter()
            .filter(|expected| {
                let expected_lower = expected.to_lowercase();
                !actual
                    .iter()
                    .any(|h| h.contains(&expected_lower) || expected_lower.contains(h.as_str()))
            })
            .copied()
            .collect();

        if missing.is_empty() {
            None
        } else {
            Some(format!("Missing expected headers: {}", missing.join(", ")))
        }
    }
}
