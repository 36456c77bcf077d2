// In-memory store session: catalog, search and per-app scans
use tracing::{info, warn};

use crate::{
    models::{CatalogEntry, ScanReport},
    pipeline::GenerationPipeline,
};

pub const CATALOG_LOAD_FAILED: &str =
    "Failed to load app data. Please check your API key and try again.";

/// The catalog a user browses during one session
///
/// Nothing is persisted; entries live until the storefront is dropped.
pub struct Storefront {
    pipeline: GenerationPipeline,
    apps: Vec<CatalogEntry>,
    load_error: Option<String>,
}

impl Storefront {
    /// Empty storefront; call `reload` to fetch the catalog
    pub fn new(pipeline: GenerationPipeline) -> Self {
        Self {
            pipeline,
            apps: Vec::new(),
            load_error: None,
        }
    }

    /// Create a storefront and fetch its initial catalog
    pub async fn load(pipeline: GenerationPipeline) -> Self {
        let mut storefront = Self::new(pipeline);
        storefront.reload().await;
        storefront
    }

    /// Replace the catalog with a freshly generated one
    ///
    /// On failure the catalog is left empty and `load_error` is set.
    pub async fn reload(&mut self) {
        match self.pipeline.generate_catalog().await {
            Ok(apps) => {
                info!("Loaded {} apps", apps.len());
                self.apps = apps;
                self.load_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch initial apps");
                self.apps.clear();
                self.load_error = Some(CATALOG_LOAD_FAILED.to_string());
            }
        }
    }

    pub fn apps(&self) -> &[CatalogEntry] {
        &self.apps
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }

    /// Entries whose name or category contains `term`, ignoring case
    pub fn filter(&self, term: &str) -> Vec<&CatalogEntry> {
        self.apps.iter().filter(|app| app.matches(term)).collect()
    }

    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.apps.iter().find(|app| app.name == name)
    }

    /// Scan an app, standing in the communication-failure report if generation fails
    ///
    /// Always yields a report so the detail view has something to show.
    pub async fn scan_app(&self, app_name: &str) -> ScanReport {
        match self.pipeline.generate_scan(app_name).await {
            Ok(report) => report,
            Err(e) => {
                warn!(app = app_name, error = %e, "Failed to perform scan");
                ScanReport::communication_failure()
            }
        }
    }

    /// Add an approved upload at the top of the catalog
    pub fn add_uploaded(&mut self, entry: CatalogEntry) {
        info!(app = %entry.name, "Adding uploaded app");
        self.apps.insert(0, entry);
    }
}
