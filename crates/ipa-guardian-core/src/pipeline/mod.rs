// Generation & validation pipeline
//
// Every generator follows the same steps: build a prompt, declare the response
// schema, call the service, decode the text and check it. Whatever goes wrong
// comes back as a single `Error::Generation` tagged with the generator.
pub mod catalog;
pub mod scan;
pub mod threat_scan;

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::GenerationTarget,
    models::{CatalogEntry, ScanReport, ThreatScanReport},
    service::ContentGenerator,
    Error, Result,
};

pub const DEFAULT_CATALOG_SIZE: usize = 12;

/// Entry point for the three generators
///
/// Holds no per-call state, so one pipeline can serve concurrent calls.
#[derive(Clone)]
pub struct GenerationPipeline {
    service: Arc<dyn ContentGenerator>,
    catalog_size: usize,
}

impl GenerationPipeline {
    pub fn new(service: Arc<dyn ContentGenerator>) -> Self {
        Self {
            service,
            catalog_size: DEFAULT_CATALOG_SIZE,
        }
    }

    pub fn with_catalog_size(mut self, catalog_size: usize) -> Self {
        self.catalog_size = catalog_size;
        self
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    /// Generate the initial store catalog
    pub async fn generate_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let count = self.catalog_size;
        let result = async {
            let text = self
                .service
                .generate_json(&catalog::prompt(count), &catalog::schema())
                .await?;
            catalog::decode(&text, count)
        }
        .await;

        finish(GenerationTarget::Catalog, result)
    }

    /// Generate a simulated security scan for a catalog entry
    pub async fn generate_scan(&self, app_name: &str) -> Result<ScanReport> {
        let app_name = require_input(app_name, "app name")?;
        let result = async {
            let text = self
                .service
                .generate_json(&scan::prompt(app_name), &scan::schema())
                .await?;
            scan::decode(&text)
        }
        .await;

        finish(GenerationTarget::Scan, result)
    }

    /// Generate a multi-engine threat scan for an uploaded package
    pub async fn generate_threat_scan(&self, file_name: &str) -> Result<ThreatScanReport> {
        let file_name = require_input(file_name, "file name")?;
        let result = async {
            let text = self
                .service
                .generate_json(&threat_scan::prompt(file_name), &threat_scan::schema())
                .await?;
            threat_scan::decode(&text)
        }
        .await;

        finish(GenerationTarget::ThreatScan, result)
    }
}

fn require_input<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(value)
}

fn finish<T>(target: GenerationTarget, result: Result<T>) -> Result<T> {
    match result {
        Ok(record) => {
            info!(?target, "Generation succeeded");
            Ok(record)
        }
        Err(err) => {
            warn!(?target, error = %err, "Generation failed");
            Err(Error::generation(target, err))
        }
    }
}

/// Trim the service text and decode it into `T`
pub(crate) fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let trimmed = text.trim();
    debug!(len = trimmed.len(), "Decoding generated JSON");
    Ok(serde_json::from_str(trimmed)?)
}

/// Reject empty or whitespace-only required strings
pub(crate) fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::SchemaViolation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScanStatus, ThreatStatus};
    use crate::service::MockContentGenerator;
    use serde_json::json;

    fn pipeline_with(mock: MockContentGenerator) -> GenerationPipeline {
        GenerationPipeline::new(Arc::new(mock))
    }

    fn scan_json(status: &str) -> String {
        json!({
            "status": status,
            "details": [
                { "check": "Signature Verification", "result": "Passed", "details": "Valid signature." },
                { "check": "Permission Analysis", "result": "Warning", "details": "Requests contacts." },
                { "check": "Malware Scan (Heuristics)", "result": "Passed", "details": "Nothing found." },
                { "check": "Network Traffic Analysis", "result": "Not applicable", "details": "Offline app." }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_catalog_prompt_and_schema_are_sent() {
        let mut mock = MockContentGenerator::new();
        mock.expect_generate_json()
            .withf(|prompt, schema| {
                prompt.contains("3 popular and diverse fictional iOS apps")
                    && schema.items.is_some()
            })
            .times(1)
            .returning(|_, _| Ok(catalog::tests::catalog_json(3)));

        let apps = pipeline_with(mock)
            .with_catalog_size(3)
            .generate_catalog()
            .await
            .unwrap();

        assert_eq!(apps.len(), 3);
        assert!(apps.iter().all(|a| !a.is_uploaded));
    }

    #[tokio::test]
    async fn test_transport_failure_is_generation_error() {
        let mut mock = MockContentGenerator::new();
        mock.expect_generate_json()
            .times(1)
            .returning(|_, _| Err(Error::ApiError("connection reset".into())));

        let err = pipeline_with(mock).generate_scan("Photon").await.unwrap_err();
        assert_eq!(err.generation_target(), Some(GenerationTarget::Scan));
        match err {
            Error::Generation { source, .. } => assert!(matches!(*source, Error::ApiError(_))),
            other => panic!("expected Generation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_generation_error() {
        let mut mock = MockContentGenerator::new();
        mock.expect_generate_json()
            .returning(|_, _| Ok("{\"status\": \"Clean\", \"details\": [".to_string()));

        let err = pipeline_with(mock).generate_scan("Photon").await.unwrap_err();
        match err {
            Error::Generation { target, source } => {
                assert_eq!(target, GenerationTarget::Scan);
                assert!(matches!(*source, Error::SerializationError(_)));
            }
            other => panic!("expected Generation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_app_name_never_reaches_service() {
        let mut mock = MockContentGenerator::new();
        mock.expect_generate_json().times(0);

        let err = pipeline_with(mock).generate_scan("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_concurrent_scans_resolve_independently() {
        let mut mock = MockContentGenerator::new();
        mock.expect_generate_json()
            .times(2)
            .returning(|prompt, _| {
                if prompt.contains("'Alpha'") {
                    Ok(scan_json("Clean"))
                } else {
                    Ok(scan_json("Warning"))
                }
            });

        let pipeline = pipeline_with(mock);
        let (alpha, beta) =
            futures::join!(pipeline.generate_scan("Alpha"), pipeline.generate_scan("Beta"));

        assert_eq!(alpha.unwrap().status, ScanStatus::Clean);
        assert_eq!(beta.unwrap().status, ScanStatus::Warning);
    }

    #[tokio::test]
    async fn test_one_failed_call_does_not_affect_another() {
        let mut mock = MockContentGenerator::new();
        mock.expect_generate_json().times(2).returning(|prompt, _| {
            if prompt.contains("'Broken'") {
                Err(Error::ApiError("timeout".into()))
            } else {
                Ok(scan_json("Clean"))
            }
        });

        let pipeline = pipeline_with(mock);
        let (broken, fine) =
            futures::join!(pipeline.generate_scan("Broken"), pipeline.generate_scan("Fine"));

        assert!(broken.is_err());
        assert_eq!(fine.unwrap().status, ScanStatus::Clean);
    }

    #[tokio::test]
    async fn test_threat_scan_is_sanitized_before_decoding() {
        let mut mock = MockContentGenerator::new();
        mock.expect_generate_json()
            .withf(|prompt, _| prompt.contains("'Budgeteer.ipa'"))
            .returning(|_, _| Ok(threat_scan::tests::clean_report_json(true)));

        let report = pipeline_with(mock)
            .generate_threat_scan("Budgeteer.ipa")
            .await
            .unwrap();

        assert_eq!(report.status, ThreatStatus::Clean);
        assert!(report.details.iter().all(|d| d.threat_name.is_none()));
    }
}
