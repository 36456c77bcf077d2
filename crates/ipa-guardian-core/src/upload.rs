// Upload review: threat-scan an uploaded package, then approve or escalate it
use tracing::{info, warn};

use crate::{
    models::{CatalogEntry, ThreatScanReport},
    pipeline::GenerationPipeline,
    state::GenerationState,
    Error, Result,
};

pub const UPLOAD_SCAN_FAILED: &str = "The AI-powered scan failed. Please try again.";

const PACKAGE_EXTENSION: &str = ".ipa";

/// One uploaded file moving through scan and review
#[derive(Debug)]
pub struct UploadReview {
    file_name: String,
    scan: GenerationState<ThreatScanReport>,
    submitted: bool,
}

impl UploadReview {
    /// Start a review; only `.ipa` packages are accepted
    pub fn new(file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into().trim().to_string();

        if file_name.is_empty() {
            return Err(Error::InvalidInput("file name must not be empty".into()));
        }
        if !file_name.to_lowercase().ends_with(PACKAGE_EXTENSION) {
            return Err(Error::InvalidInput(format!(
                "{} is not an {} package",
                file_name, PACKAGE_EXTENSION
            )));
        }

        Ok(Self {
            file_name,
            scan: GenerationState::Idle,
            submitted: false,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn state(&self) -> &GenerationState<ThreatScanReport> {
        &self.scan
    }

    pub fn report(&self) -> Option<&ThreatScanReport> {
        self.scan.record()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Run the threat scan; each call is a fresh attempt
    pub async fn scan(&mut self, pipeline: &GenerationPipeline) -> Result<&ThreatScanReport> {
        self.scan.begin();
        self.submitted = false;

        match pipeline.generate_threat_scan(&self.file_name).await {
            Ok(report) => {
                info!(
                    file = %self.file_name,
                    status = %report.status,
                    positives = report.positives,
                    "Upload scan complete"
                );
                Ok(self.scan.succeed(report))
            }
            Err(e) => {
                warn!(file = %self.file_name, error = %e, "Upload scan failed");
                self.scan.fail(UPLOAD_SCAN_FAILED);
                Err(e)
            }
        }
    }

    /// Turn a clean upload into a catalog entry
    pub fn approve(&self) -> Result<CatalogEntry> {
        match self.report() {
            Some(report) if report.is_clean() => Ok(CatalogEntry::from_upload(&self.file_name)),
            Some(report) => Err(Error::ApprovalRejected(format!(
                "{} engines detected threats in {}",
                report.positives, self.file_name
            ))),
            None => Err(Error::ApprovalRejected(format!(
                "{} has not been scanned",
                self.file_name
            ))),
        }
    }

    /// Flag an infected upload for manual review
    pub fn submit_for_review(&mut self) -> Result<()> {
        match self.report() {
            Some(report) if !report.is_clean() => {
                info!(file = %self.file_name, "Submitted for review");
                self.submitted = true;
                Ok(())
            }
            Some(_) => Err(Error::InvalidInput(format!(
                "{} is clean; approve it instead",
                self.file_name
            ))),
            None => Err(Error::InvalidInput(format!(
                "{} has not been scanned",
                self.file_name
            ))),
        }
    }

    /// Discard the scan result ("Scan Another")
    pub fn reset(&mut self) {
        self.scan.reset();
        self.submitted = false;
    }
}
