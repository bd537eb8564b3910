// ============================================================
// CATEGORY PROCESSORS
// ============================================================
// Per-category row transformation and validation rules

use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::use_cases::status::{is_known_status, normalize_status};
use crate::domain::batch::{MasterData, ProcessingResult};
use crate::domain::record::{CellValue, Record};
use crate::domain::registry::{FileCategory, RegistryEntry};

static SCRIPT_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap());

static JS_PROTOCOL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript:").unwrap());

static EVENT_ATTR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\bon\w+="[^"]*""#).unwrap());

/// Soft-mandatory application fields: absence is a warning, not a
/// rejection (only the applicationId check rejects)
const APPLICATION_MANDATORY_FIELDS: &[&str] = &[
    "applicationStatusDescription",
    "creationTimeStamp",
    "baseDepartmentName",
    "categoryCode",
    "applicantDistrictName",
];

const APPLICATION_DATE_FIELDS: &[&str] = &["creationTimeStamp", "lastUpdate"];
const WORKFLOW_DATE_FIELDS: &[&str] = &["actionDate", "processedDate", "changeDate"];

const GENERIC_ID_FIELDS: &[&str] = &["id", "Id", "ID"];
const MASTER_DATA_ID_FIELDS: &[&str] = &[
    "baseDepartmentId",
    "departmentId",
    "districtId",
    "categoryId",
    "subCategoryId",
    "stateId",
    "ulbId",
    "wardId",
    "villageId",
    "panchayatId",
];

const VALID_USER_ROLES: &[&str] = &["admin", "officer", "clerk", "viewer", "supervisor"];
const VALID_SMS_STATUSES: &[&str] = &["sent", "delivered", "failed", "pending"];

/// Dispatch a record to its category's transformation routine
///
/// Returns the normalized record on accept, None on reject. Rejections
/// and soft issues are reported through the shared result's warnings;
/// malformed input never raises an error that aborts the batch. The
/// row number is the 1-based display row (data index + 2, accounting
/// for the header row).
pub fn process_record(
    record: Record,
    entry: Option<&RegistryEntry>,
    master: &MasterData,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    match entry.map(|e| e.category) {
        Some(FileCategory::ApplicationCore) => {
            process_application_core(record, master, result, row_number)
        }
        Some(FileCategory::Workflow) => process_workflow(record, result, row_number),
        Some(FileCategory::MasterData) => process_master_data(record, result, row_number),
        Some(FileCategory::UserManagement) => process_user_management(record, result, row_number),
        Some(FileCategory::Communication) => process_communication(record, result, row_number),
        Some(FileCategory::DocumentManagement) => {
            process_document_management(record, result, row_number)
        }
        Some(FileCategory::SpecialProgram) => process_special_program(record, result, row_number),
        Some(FileCategory::Financial) => process_financial(record, result, row_number),
        Some(FileCategory::Administrative) => process_administrative(record, result, row_number),
        Some(FileCategory::System) | Some(FileCategory::SystemLog) => {
            process_system(record, result)
        }
        // Log and reporting types get the generic best-effort treatment
        _ => process_generic(record, result, row_number),
    }
}

fn warn(result: &mut ProcessingResult, row_number: usize, message: String) {
    result.warnings.push(format!("Row {}: {}", row_number, message));
}

fn process_application_core(
    mut record: Record,
    master: &MasterData,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    let application_id = match record.get("applicationId").and_then(CellValue::as_i64) {
        Some(id) => id,
        None => {
            warn(
                result,
                row_number,
                "Missing or invalid applicationId".to_string(),
            );
            return None;
        }
    };
    record.set("applicationId", CellValue::Integer(application_id));

    if application_id <= 0 {
        warn(
            result,
            row_number,
            "applicationId must be a positive number".to_string(),
        );
    }

    for field in APPLICATION_MANDATORY_FIELDS {
        if !record.has_value(field) {
            warn(
                result,
                row_number,
                format!("Missing mandatory field: {}", field),
            );
        }
    }

    if let Some(status) = record.get_display("applicationStatusDescription") {
        if !is_known_status(&status) {
            warn(result, row_number, format!("Invalid status: {}", status));
        }
        record.set(
            "applicationStatusDescription",
            CellValue::Text(normalize_status(&status)),
        );
    }

    for field in ["baseDepartmentName", "applicantDistrictName", "categoryCode"] {
        if let Some(value) = record.get_display(field) {
            record.set(field, CellValue::Text(value));
        }
    }

    validate_date_fields(&record, APPLICATION_DATE_FIELDS, result, row_number);
    validate_master_references(&record, master, result, row_number);
    sanitize_text_fields(&mut record);

    Some(record)
}

fn process_workflow(
    mut record: Record,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    // Best-effort: workflow rows are never rejected
    if let Some(id) = record.get("applicationId").and_then(CellValue::as_i64) {
        record.set("applicationId", CellValue::Integer(id));
    }

    validate_date_fields(&record, WORKFLOW_DATE_FIELDS, result, row_number);

    Some(record)
}

fn process_master_data(
    mut record: Record,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    let has_id = record.has_any_value(GENERIC_ID_FIELDS) || record.has_any_value(MASTER_DATA_ID_FIELDS);

    if !has_id {
        warn(
            result,
            row_number,
            "Master data record missing ID field".to_string(),
        );
        return None;
    }

    record.trim_text_fields();
    Some(record)
}

fn process_user_management(
    record: Record,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    if !record.has_any_value(&["userId", "officerId", "userName"]) {
        warn(
            result,
            row_number,
            "User record missing user identifier".to_string(),
        );
        return None;
    }

    if let Some(role) = record.get_display("userRole") {
        if !VALID_USER_ROLES.contains(&role.to_lowercase().as_str()) {
            warn(result, row_number, format!("Unknown user role: {}", role));
        }
    }

    Some(record)
}

fn process_communication(
    record: Record,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    if let Some(mobile) = record.get_display("mobileNo") {
        let digits: String = mobile.chars().filter(|c| c.is_ascii_digit()).collect();
        let starts_valid = matches!(digits.chars().next(), Some('6'..='9'));
        if digits.len() != 10 || !starts_valid {
            warn(
                result,
                row_number,
                "Invalid mobile number format".to_string(),
            );
        }
    }

    if let Some(status) = record.get_display("status") {
        if !VALID_SMS_STATUSES.contains(&status.to_lowercase().as_str()) {
            warn(result, row_number, format!("Unknown SMS status: {}", status));
        }
    }

    Some(record)
}

fn process_document_management(
    record: Record,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    if !record.has_any_value(&["applicationId", "documentId"]) {
        warn(
            result,
            row_number,
            "Document record missing identifiers".to_string(),
        );
        return None;
    }

    if let Some(path) = record.get_display("filePath") {
        if !path.contains('/') && !path.contains('\\') {
            warn(result, row_number, "File path appears invalid".to_string());
        }
    }

    Some(record)
}

fn process_special_program(
    record: Record,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    if !record.has_any_value(&["shivirId", "eventId", "programId"]) {
        warn(
            result,
            row_number,
            "Special program record missing event identifier".to_string(),
        );
        return None;
    }

    Some(record)
}

fn process_financial(
    record: Record,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    let amount_field = ["amount", "feeAmount"]
        .into_iter()
        .find(|f| record.has_value(f));

    if let Some(field) = amount_field {
        let valid = record
            .get(field)
            .and_then(CellValue::as_f64)
            .map_or(false, |amount| amount >= 0.0);
        if !valid {
            let display = record.get_display(field).unwrap_or_default();
            warn(result, row_number, format!("Invalid amount: {}", display));
        }
    }

    Some(record)
}

fn process_administrative(
    record: Record,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    if !record.has_any_value(&["officeId", "designationId", "officeName"]) {
        warn(
            result,
            row_number,
            "Administrative record missing office/designation info".to_string(),
        );
        return None;
    }

    Some(record)
}

fn process_system(mut record: Record, _result: &mut ProcessingResult) -> Option<Record> {
    record.trim_text_fields();
    Some(record)
}

fn process_generic(
    record: Record,
    result: &mut ProcessingResult,
    row_number: usize,
) -> Option<Record> {
    if record.is_blank() {
        warn(result, row_number, "Empty record".to_string());
        return None;
    }

    Some(record)
}

fn validate_date_fields(
    record: &Record,
    fields: &[&str],
    result: &mut ProcessingResult,
    row_number: usize,
) {
    for field in fields {
        if record.has_value(field)
            && record.get(field).and_then(CellValue::as_datetime).is_none()
        {
            warn(result, row_number, format!("Invalid date in {}", field));
        }
    }
}

fn validate_master_references(
    record: &Record,
    master: &MasterData,
    result: &mut ProcessingResult,
    row_number: usize,
) {
    let checks: [(&str, &std::collections::HashMap<String, String>, &str); 3] = [
        ("baseDepartmentId", &master.departments, "Department"),
        ("applicantDistrictId", &master.districts, "District"),
        ("applicationCategoryId", &master.categories, "Category"),
    ];

    for (field, map, label) in checks {
        if map.is_empty() {
            continue;
        }
        if let Some(id) = record.get_display(field) {
            if !map.contains_key(&id) {
                warn(result, row_number, format!("{} ID {} not found", label, id));
            }
        }
    }
}

fn sanitize_text_fields(record: &mut Record) {
    for value in record.fields.values_mut() {
        if let CellValue::Text(s) = value {
            if s.contains('<') || s.contains("javascript:") || s.contains("on") {
                let cleaned = SCRIPT_TAG_PATTERN.replace_all(s, "");
                let cleaned = JS_PROTOCOL_PATTERN.replace_all(&cleaned, "");
                let cleaned = EVENT_ATTR_PATTERN.replace_all(&cleaned, "");
                if cleaned != *s {
                    *value = CellValue::Text(cleaned.to_string());
                }
            }
        }
    }
}
