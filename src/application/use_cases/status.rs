// ============================================================
// STATUS NORMALIZATION
// ============================================================
// Map source-language status tokens to canonical bilingual labels

/// Status token -> canonical label, checked in declaration order via
/// case-insensitive substring match. Canonical labels contain their own
/// token, which keeps normalization idempotent.
static STATUS_MAP: &[(&str, &str)] = &[
    ("स्वीकृत", "Approved (स्वीकृत)"),
    ("approved", "Approved (स्वीकृत)"),
    ("लंबित", "Pending (लंबित)"),
    ("pending", "Pending (लंबित)"),
    ("निराकृत", "Rejected (निराकृत)"),
    ("rejected", "Rejected (निराकृत)"),
    ("प्रक्रियाधीन", "Under Process (प्रक्रियाधीन)"),
    ("under review", "Under Review"),
    ("processing", "Processing"),
];

const APPROVED_TOKENS: &[&str] = &["स्वीकृत", "approved"];
const PENDING_TOKENS: &[&str] = &["लंबित", "pending"];
const REJECTED_TOKENS: &[&str] = &["निराकृत", "rejected"];

/// Canonical status bucket used by metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    Approved,
    Pending,
    Rejected,
}

impl StatusBucket {
    pub fn label(&self) -> &'static str {
        match self {
            StatusBucket::Approved => "Approved (स्वीकृत)",
            StatusBucket::Pending => "Pending (लंबित)",
            StatusBucket::Rejected => "Rejected (निराकृत)",
        }
    }
}

/// Map a status string to its canonical bilingual label
/// Unmatched input passes through unchanged.
pub fn normalize_status(status: &str) -> String {
    let needle = status.to_lowercase();
    let needle = needle.trim();

    for (token, label) in STATUS_MAP {
        if needle.contains(token) {
            return label.to_string();
        }
    }

    status.to_string()
}

/// Whether the status text matches any known token
pub fn is_known_status(status: &str) -> bool {
    let needle = status.to_lowercase();
    let needle = needle.trim();
    STATUS_MAP.iter().any(|(token, _)| needle.contains(token))
}

/// Bucket a status string for approved/pending/rejected counting
pub fn status_bucket(status: &str) -> Option<StatusBucket> {
    let needle = status.to_lowercase();

    if APPROVED_TOKENS.iter().any(|t| needle.contains(t)) {
        Some(StatusBucket::Approved)
    } else if PENDING_TOKENS.iter().any(|t| needle.contains(t)) {
        Some(StatusBucket::Pending)
    } else if REJECTED_TOKENS.iter().any(|t| needle.contains(t)) {
        Some(StatusBucket::Rejected)
    } else {
        None
    }
}
