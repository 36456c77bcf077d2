use serde::{Deserialize, Deserializer, Serialize};

/// Number of engines in every upload threat-scan report
pub const THREAT_SCAN_ENGINES: u32 = 15;

const UPLOADED_VERSION: &str = "1.0.0 (Uploaded)";
const UPLOADED_DESCRIPTION: &str = "User uploaded application.";
const UPLOADED_CATEGORY: &str = "Utilities";
const PLACEHOLDER_ICON_URL: &str = "https://picsum.photos/200";

/// An app listed in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub version: String,
    pub description: String,
    pub category: String,
    pub icon_url: String,
    /// Only set for entries added from an approved upload
    #[serde(default)]
    pub is_uploaded: bool,
}

impl CatalogEntry {
    /// Entry for an upload that passed its threat scan
    pub fn from_upload(file_name: &str) -> Self {
        Self {
            name: file_name.replacen(".ipa", "", 1),
            version: UPLOADED_VERSION.to_string(),
            description: UPLOADED_DESCRIPTION.to_string(),
            category: UPLOADED_CATEGORY.to_string(),
            icon_url: PLACEHOLDER_ICON_URL.to_string(),
            is_uploaded: true,
        }
    }

    /// Case-insensitive match on name or category
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.category.to_lowercase().contains(&term)
    }
}

/// Overall verdict of an on-demand scan
///
/// `Error` never comes from the service. It only marks the local fallback
/// report built when the service could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Clean,
    Warning,
    Error,
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Clean => write!(f, "Clean"),
            ScanStatus::Warning => write!(f, "Warning"),
            ScanStatus::Error => write!(f, "Error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckResult {
    Passed,
    Failed,
    Warning,
    #[serde(rename = "Not applicable")]
    NotApplicable,
}

impl CheckResult {
    pub fn label(&self) -> &'static str {
        match self {
            CheckResult::Passed => "Passed",
            CheckResult::Failed => "Failed",
            CheckResult::Warning => "Warning",
            CheckResult::NotApplicable => "Not applicable",
        }
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One check within an on-demand scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanCheck {
    pub check: String,
    pub result: CheckResult,
    pub details: String,
}

/// Simulated security scan of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub status: ScanStatus,
    pub details: Vec<ScanCheck>,
}

impl ScanReport {
    /// Stand-in report shown when the scan service could not be reached
    pub fn communication_failure() -> Self {
        Self {
            status: ScanStatus::Error,
            details: vec![ScanCheck {
                check: "API Communication".to_string(),
                result: CheckResult::Failed,
                details: "Could not retrieve scan results from the AI service.".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatStatus {
    Clean,
    Infected,
}

impl std::fmt::Display for ThreatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatStatus::Clean => write!(f, "Clean"),
            ThreatStatus::Infected => write!(f, "Infected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineVerdict {
    Clean,
    Detected,
}

/// A single engine's line in a threat-scan report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineResult {
    pub engine: String,
    pub result: EngineVerdict,
    /// Must be present in the JSON even when null
    #[serde(deserialize_with = "required_nullable")]
    pub threat_name: Option<String>,
}

/// Multi-engine threat scan of an uploaded package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreatScanReport {
    pub status: ThreatStatus,
    pub positives: u32,
    pub total: u32,
    pub details: Vec<EngineResult>,
}

impl ThreatScanReport {
    pub fn is_clean(&self) -> bool {
        self.status == ThreatStatus::Clean
    }

    /// Engines that flagged the package
    pub fn detections(&self) -> impl Iterator<Item = &EngineResult> {
        self.details
            .iter()
            .filter(|d| d.result == EngineVerdict::Detected)
    }
}

// Plain `Option` fields may be omitted; this keeps the key mandatory.
fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::deserialize(deserializer)
}
