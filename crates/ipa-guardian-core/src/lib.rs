// Core of IPA Guardian: typed records out of generated JSON
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod sanitize;
pub mod service;
pub mod state;
pub mod storefront;
pub mod upload;

pub use config::Config;
pub use error::{Error, GenerationTarget};
pub use export::{ExportFormat, Exporter};
pub use models::{
    CatalogEntry, CheckResult, EngineResult, EngineVerdict, ScanCheck, ScanReport, ScanStatus,
    ThreatScanReport, ThreatStatus,
};
pub use pipeline::GenerationPipeline;
pub use providers::GeminiProvider;
pub use service::ContentGenerator;
pub use state::GenerationState;
pub use storefront::Storefront;
pub use upload::UploadReview;

pub type Result<T> = std::result::Result<T, Error>;
