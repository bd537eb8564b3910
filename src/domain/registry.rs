// ============================================================
// FILE TYPE REGISTRY
// ============================================================
// Static table of all known government record types

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Processing category a registered file type belongs to
///
/// The category fixes which transformation/validation routine runs for
/// each row. Log and reporting categories fall back to generic
/// processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    ApplicationCore,
    ApplicationLog,
    Workflow,
    WorkflowLog,
    MasterData,
    UserManagement,
    UserManagementLog,
    Communication,
    DocumentManagement,
    SpecialProgram,
    Reporting,
    Financial,
    Administrative,
    System,
    SystemLog,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::ApplicationCore => "application_core",
            FileCategory::ApplicationLog => "application_log",
            FileCategory::Workflow => "workflow",
            FileCategory::WorkflowLog => "workflow_log",
            FileCategory::MasterData => "master_data",
            FileCategory::UserManagement => "user_management",
            FileCategory::UserManagementLog => "user_management_log",
            FileCategory::Communication => "communication",
            FileCategory::DocumentManagement => "document_management",
            FileCategory::SpecialProgram => "special_program",
            FileCategory::Reporting => "reporting",
            FileCategory::Financial => "financial",
            FileCategory::Administrative => "administrative",
            FileCategory::System => "system",
            FileCategory::SystemLog => "system_log",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One registered file type
///
/// Keyed by the canonical lowercase file-name stem. Priority 1 types
/// carry the reference data later files depend on.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryEntry {
    pub key: &'static str,
    pub category: FileCategory,
    pub priority: u8,
    pub description: &'static str,
    pub expected_headers: &'static [&'static str],
}

/// All known government file types, in declaration order
pub static FILE_TYPE_REGISTRY: &[RegistryEntry] = &[
    // Application core files
    RegistryEntry {
        key: "applicationdetails",
        category: FileCategory::ApplicationCore,
        priority: 1,
        description: "Main application details",
        expected_headers: &[
            "applicationId",
            "applicantName",
            "applicationStatusDescription",
            "creationTimeStamp",
        ],
    },
    RegistryEntry {
        key: "applicationdetailsonline",
        category: FileCategory::ApplicationCore,
        priority: 1,
        description: "Online application details",
        expected_headers: &["applicationId", "modeOfApplication", "applicantDistrictName"],
    },
    RegistryEntry {
        key: "applicationdetailslog",
        category: FileCategory::ApplicationLog,
        priority: 3,
        description: "Application details change log",
        expected_headers: &["applicationId", "lastUpdate", "userId"],
    },
    // Workflow files
    RegistryEntry {
        key: "applicationaction",
        category: FileCategory::Workflow,
        priority: 2,
        description: "Application workflow actions",
        expected_headers: &["applicationId", "actionDetail", "actionDate", "actionBy"],
    },
    RegistryEntry {
        key: "applicationstatus",
        category: FileCategory::Workflow,
        priority: 2,
        description: "Application status definitions",
        expected_headers: &["statusId", "statusDescription", "statusCode"],
    },
    RegistryEntry {
        key: "applicationstatuslog",
        category: FileCategory::WorkflowLog,
        priority: 3,
        description: "Application status change log",
        expected_headers: &["applicationId", "oldStatus", "newStatus", "changeDate"],
    },
    // Master data files
    RegistryEntry {
        key: "basedepartment",
        category: FileCategory::MasterData,
        priority: 1,
        description: "Department master data",
        expected_headers: &[
            "baseDepartmentId",
            "baseDepartmentName",
            "baseDepartmentNameLocal",
        ],
    },
    RegistryEntry {
        key: "state",
        category: FileCategory::MasterData,
        priority: 1,
        description: "State master data",
        expected_headers: &["stateId", "stateName", "stateCode"],
    },
    RegistryEntry {
        key: "district",
        category: FileCategory::MasterData,
        priority: 1,
        description: "District master data",
        expected_headers: &["districtId", "districtName", "districtNameLocal", "stateId"],
    },
    RegistryEntry {
        key: "wards",
        category: FileCategory::MasterData,
        priority: 2,
        description: "Ward master data",
        expected_headers: &["wardId", "wardName", "wardLocalityCode", "ulbId"],
    },
    RegistryEntry {
        key: "ulbdetail",
        category: FileCategory::MasterData,
        priority: 2,
        description: "Urban Local Body details",
        expected_headers: &["ulbId", "ulbName", "ulbType", "districtId"],
    },
    // User management files
    RegistryEntry {
        key: "userlogin",
        category: FileCategory::UserManagement,
        priority: 2,
        description: "User login credentials",
        expected_headers: &["userId", "userName", "userRole", "departmentId"],
    },
    RegistryEntry {
        key: "officerdetails",
        category: FileCategory::UserManagement,
        priority: 2,
        description: "Officer profile details",
        expected_headers: &["officerId", "officerName", "designation", "departmentId"],
    },
    RegistryEntry {
        key: "logintrail",
        category: FileCategory::UserManagementLog,
        priority: 3,
        description: "User login activity log",
        expected_headers: &["userId", "loginTime", "logoutTime", "ipAddress"],
    },
    // Communication files
    RegistryEntry {
        key: "smssentdetail",
        category: FileCategory::Communication,
        priority: 2,
        description: "SMS delivery details",
        expected_headers: &["smsId", "applicationId", "mobileNo", "sentDate", "status"],
    },
    RegistryEntry {
        key: "smsemailtemplate",
        category: FileCategory::Communication,
        priority: 3,
        description: "Communication templates",
        expected_headers: &["templateId", "templateName", "templateContent", "templateType"],
    },
    // Document management files
    RegistryEntry {
        key: "documentstore",
        category: FileCategory::DocumentManagement,
        priority: 2,
        description: "Document storage details",
        expected_headers: &[
            "documentId",
            "applicationId",
            "documentName",
            "filePath",
            "uploadDate",
        ],
    },
    RegistryEntry {
        key: "documentpathtbl",
        category: FileCategory::DocumentManagement,
        priority: 3,
        description: "Document path mappings",
        expected_headers: &["pathId", "documentId", "physicalPath", "virtualPath"],
    },
    // Special programs
    RegistryEntry {
        key: "samadhaanshivir",
        category: FileCategory::SpecialProgram,
        priority: 2,
        description: "Samadhan Shivir event details",
        expected_headers: &[
            "shivirId",
            "shivirDate",
            "shivirLocation",
            "applicationsProcessed",
        ],
    },
    RegistryEntry {
        key: "samadhaanshivirmapping",
        category: FileCategory::SpecialProgram,
        priority: 2,
        description: "Shivir application mappings",
        expected_headers: &["mappingId", "shivirId", "applicationId", "processedDate"],
    },
    // Reporting files
    RegistryEntry {
        key: "dailyapplicationreporting",
        category: FileCategory::Reporting,
        priority: 3,
        description: "Daily application statistics",
        expected_headers: &[
            "reportDate",
            "totalApplications",
            "approvedCount",
            "pendingCount",
        ],
    },
    RegistryEntry {
        key: "eventlog",
        category: FileCategory::SystemLog,
        priority: 3,
        description: "System event logging",
        expected_headers: &["eventId", "eventType", "eventDate", "userId", "description"],
    },
    // System files
    RegistryEntry {
        key: "noticeboard",
        category: FileCategory::System,
        priority: 3,
        description: "System notices and announcements",
        expected_headers: &["noticeId", "noticeTitle", "noticeContent", "publishDate"],
    },
    RegistryEntry {
        key: "keyhelper",
        category: FileCategory::System,
        priority: 3,
        description: "System configuration keys",
        expected_headers: &["keyId", "keyName", "keyValue", "keyDescription"],
    },
    // Additional master data
    RegistryEntry {
        key: "applicationcategorymaster",
        category: FileCategory::MasterData,
        priority: 1,
        description: "Application category master",
        expected_headers: &["categoryId", "categoryName", "categoryCode", "departmentId"],
    },
    RegistryEntry {
        key: "subcategory",
        category: FileCategory::MasterData,
        priority: 2,
        description: "Application sub-category data",
        expected_headers: &["subCategoryId", "subCategoryName", "categoryId"],
    },
    RegistryEntry {
        key: "village",
        category: FileCategory::MasterData,
        priority: 2,
        description: "Village master data",
        expected_headers: &["villageId", "villageName", "districtId", "panchayatId"],
    },
    RegistryEntry {
        key: "panchayat",
        category: FileCategory::MasterData,
        priority: 2,
        description: "Panchayat master data",
        expected_headers: &["panchayatId", "panchayatName", "districtId"],
    },
    // Financial files
    RegistryEntry {
        key: "applicationfee",
        category: FileCategory::Financial,
        priority: 2,
        description: "Application fee structure",
        expected_headers: &["feeId", "categoryId", "feeAmount", "feeDescription"],
    },
    RegistryEntry {
        key: "paymentdetails",
        category: FileCategory::Financial,
        priority: 2,
        description: "Payment transaction details",
        expected_headers: &[
            "paymentId",
            "applicationId",
            "amount",
            "paymentDate",
            "paymentMode",
        ],
    },
    RegistryEntry {
        key: "receiptdetails",
        category: FileCategory::Financial,
        priority: 2,
        description: "Payment receipt details",
        expected_headers: &["receiptId", "paymentId", "receiptNumber", "receiptDate"],
    },
    // Administrative files
    RegistryEntry {
        key: "officemapping",
        category: FileCategory::Administrative,
        priority: 2,
        description: "Office hierarchy mapping",
        expected_headers: &["mappingId", "officeId", "parentOfficeId", "officeName"],
    },
    RegistryEntry {
        key: "designation",
        category: FileCategory::Administrative,
        priority: 2,
        description: "Officer designation master",
        expected_headers: &["designationId", "designationName", "designationLevel"],
    },
    // Additional workflow files
    RegistryEntry {
        key: "applicationrouting",
        category: FileCategory::Workflow,
        priority: 2,
        description: "Application routing rules",
        expected_headers: &[
            "routeId",
            "categoryId",
            "fromOffice",
            "toOffice",
            "routingCondition",
        ],
    },
    RegistryEntry {
        key: "escalationmatrix",
        category: FileCategory::Workflow,
        priority: 3,
        description: "Escalation time matrix",
        expected_headers: &["escalationId", "categoryId", "officeName", "escalationDays"],
    },
    // Additional system files
    RegistryEntry {
        key: "holidaymaster",
        category: FileCategory::System,
        priority: 3,
        description: "Holiday calendar master",
        expected_headers: &["holidayId", "holidayDate", "holidayName", "holidayType"],
    },
    RegistryEntry {
        key: "systemconfiguration",
        category: FileCategory::System,
        priority: 3,
        description: "System configuration parameters",
        expected_headers: &["configId", "configKey", "configValue", "configDescription"],
    },
    RegistryEntry {
        key: "audittrail",
        category: FileCategory::SystemLog,
        priority: 3,
        description: "System audit trail",
        expected_headers: &["auditId", "userId", "action", "timestamp", "details"],
    },
    RegistryEntry {
        key: "errorlog",
        category: FileCategory::SystemLog,
        priority: 3,
        description: "System error logging",
        expected_headers: &["errorId", "errorType", "errorMessage", "errorDate", "userId"],
    },
    RegistryEntry {
        key: "performancelog",
        category: FileCategory::SystemLog,
        priority: 3,
        description: "System performance metrics",
        expected_headers: &["logId", "operation", "executionTime", "recordCount", "logDate"],
    },
];

static REGISTRY_INDEX: Lazy<HashMap<&'static str, &'static RegistryEntry>> =
    Lazy::new(|| FILE_TYPE_REGISTRY.iter().map(|e| (e.key, e)).collect());

/// Exact key lookup
pub fn find_entry(key: &str) -> Option<&'static RegistryEntry> {
    REGISTRY_INDEX.get(key).copied()
}

/// All registered canonical file-type keys, in declaration order
pub fn supported_file_types() -> Vec<&'static str> {
    FILE_TYPE_REGISTRY.iter().map(|e| e.key).collect()
}
