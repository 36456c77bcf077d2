// On-demand scan generation for catalog entries
use ipa_guardian_api::Schema;
use serde::Deserialize;

use super::{parse_json, require_text};
use crate::{
    models::{ScanCheck, ScanReport, ScanStatus},
    Error, Result,
};

/// The statuses the service may return; `Error` is local-only
#[derive(Debug, Clone, Copy, Deserialize)]
enum GeneratedStatus {
    Clean,
    Warning,
}

impl From<GeneratedStatus> for ScanStatus {
    fn from(status: GeneratedStatus) -> Self {
        match status {
            GeneratedStatus::Clean => ScanStatus::Clean,
            GeneratedStatus::Warning => ScanStatus::Warning,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeneratedScan {
    status: GeneratedStatus,
    details: Vec<ScanCheck>,
}

pub fn prompt(app_name: &str) -> String {
    format!(
        "Simulate a detailed virus scan report for a fictional iOS IPA file named '{app_name}'. \
         The report should include a final status ('Clean' or 'Warning'), and a list of 4 to 6 \
         detailed checks performed with individual results (e.g., 'Signature Verification', \
         'Malware Scan (Heuristics)', 'Permission Analysis', 'Network Traffic Analysis'). \
         Randomly decide if the app should have a 'Warning' status (about a 25% chance). \
         If there is a warning, make it plausible, like 'Unusual network activity detected' or \
         'Requests excessive permissions for its category'. Provide the response in the \
         specified JSON format."
    )
}

pub fn schema() -> Schema {
    Schema::object([
        (
            "status",
            Schema::string()
                .with_enum(["Clean", "Warning"])
                .with_description("The final safety status of the scan."),
        ),
        (
            "details",
            Schema::array(Schema::object([
                (
                    "check",
                    Schema::string().with_description("The name of the security check performed."),
                ),
                (
                    "result",
                    Schema::string()
                        .with_enum(["Passed", "Failed", "Warning", "Not applicable"])
                        .with_description("The result of this specific check."),
                ),
                (
                    "details",
                    Schema::string()
                        .with_description("A brief explanation of the check and its findings."),
                ),
            ]))
            .with_description("A list of checks performed during the scan."),
        ),
    ])
}

pub fn decode(text: &str) -> Result<ScanReport> {
    let scan: GeneratedScan = parse_json(text)?;

    if scan.details.is_empty() {
        return Err(Error::SchemaViolation(
            "scan report has no checks".to_string(),
        ));
    }
    for check in &scan.details {
        require_text(&check.check, "check name")?;
    }

    Ok(ScanReport {
        status: scan.status.into(),
        details: scan.details,
    })
}
