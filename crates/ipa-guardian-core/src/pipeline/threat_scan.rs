// Upload threat-scan generation
use ipa_guardian_api::Schema;

use super::{parse_json, require_text};
use crate::{
    models::{EngineVerdict, ThreatScanReport, ThreatStatus, THREAT_SCAN_ENGINES},
    sanitize::repair_quoted_nulls,
    Error, Result,
};

/// Upper bound on positives for an infected report
pub const MAX_POSITIVES: u32 = 3;

pub fn prompt(file_name: &str) -> String {
    format!(
        "Simulate a VirusTotal scan report for an iOS IPA file named '{file_name}'.\n\
         The final status should be 'Clean' or 'Infected'. Give it a 20% chance of being 'Infected'.\n\
         \n\
         The report must include:\n\
         1. A 'status': 'Clean' or 'Infected'.\n\
         2. A 'positives' count: 0 if clean, between 1 and {max} if infected.\n\
         3. A 'total' count: Should be exactly {total}.\n\
         4. A 'details' array with exactly {total} fictional antivirus engine results.\n\
         \n\
         Engine names should be creative (e.g., 'BitGuardian', 'Cybereason', 'iSecure', 'AvastPro', \
         'Malwarebytes Mobile').\n\
         If the status is 'Infected', the 'positives' number of engines must have a result of \
         'detected' and a plausible iOS malware threat name (e.g., 'Adware.iOS.Generic', \
         'Spyware.PegasusVariant', 'Trojan.Clicker.iOS'). All other engines must have a result \
         of 'clean' and a threat_name of null.\n\
         If the status is 'Clean', all {total} engines must have a result of 'clean' and a \
         threat_name of null.",
        max = MAX_POSITIVES,
        total = THREAT_SCAN_ENGINES,
    )
}

pub fn schema() -> Schema {
    Schema::object([
        (
            "status",
            Schema::string().with_enum(["Clean", "Infected"]),
        ),
        (
            "positives",
            Schema::integer().with_description("Number of engines that detected a threat."),
        ),
        (
            "total",
            Schema::integer().with_description("Total number of engines in the report."),
        ),
        (
            "details",
            Schema::array(Schema::object([
                (
                    "engine",
                    Schema::string().with_description("Name of the fictional antivirus engine."),
                ),
                (
                    "result",
                    Schema::string().with_enum(["clean", "detected"]),
                ),
                (
                    "threat_name",
                    Schema::string()
                        .nullable()
                        .with_description("Name of the detected threat, or null if clean."),
                ),
            ])),
        ),
    ])
}

pub fn decode(text: &str) -> Result<ThreatScanReport> {
    let repaired = repair_quoted_nulls(text.trim());
    let report: ThreatScanReport = parse_json(&repaired)?;
    validate(&report)?;
    Ok(report)
}

/// Check the cross-field consistency rules of a threat-scan report
pub fn validate(report: &ThreatScanReport) -> Result<()> {
    if report.total != THREAT_SCAN_ENGINES {
        return Err(violation(format!(
            "total must be {}, got {}",
            THREAT_SCAN_ENGINES, report.total
        )));
    }

    if report.details.len() != report.total as usize {
        return Err(violation(format!(
            "expected {} engine results, got {}",
            report.total,
            report.details.len()
        )));
    }

    let detected = report.detections().count();
    if detected != report.positives as usize {
        return Err(violation(format!(
            "positives is {} but {} engines report a detection",
            report.positives, detected
        )));
    }

    match report.status {
        ThreatStatus::Clean if report.positives != 0 => {
            return Err(violation(format!(
                "clean report has {} positives",
                report.positives
            )));
        }
        ThreatStatus::Infected if !(1..=MAX_POSITIVES).contains(&report.positives) => {
            return Err(violation(format!(
                "infected report must have 1 to {} positives, got {}",
                MAX_POSITIVES, report.positives
            )));
        }
        _ => {}
    }

    for detail in &report.details {
        require_text(&detail.engine, "engine name")?;

        match (detail.result, detail.threat_name.as_deref()) {
            (EngineVerdict::Detected, Some(name)) if !name.trim().is_empty() => {}
            (EngineVerdict::Detected, _) => {
                return Err(violation(format!(
                    "engine {} detected a threat without naming it",
                    detail.engine
                )));
            }
            (EngineVerdict::Clean, None) => {}
            (EngineVerdict::Clean, Some(name)) => {
                return Err(violation(format!(
                    "clean engine {} carries threat name {:?}",
                    detail.engine, name
                )));
            }
        }
    }

    Ok(())
}

fn violation(message: String) -> Error {
    Error::SchemaViolation(message)
}
