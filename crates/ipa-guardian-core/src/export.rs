use crate::{
    models::{CatalogEntry, EngineVerdict, ScanReport, ThreatScanReport},
    Error, Result,
};
use chrono::Utc;
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(ExportFormat::Text),
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    /// Format implied by a file path, if its extension is known
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Renders catalog entries and scan reports
pub struct Exporter;

impl Exporter {
    pub fn write_to_file<P: AsRef<Path>>(content: &str, path: P) -> Result<()> {
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn catalog(apps: &[&CatalogEntry], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => to_json(apps),
            ExportFormat::Csv => Ok(Self::catalog_csv(apps)),
            ExportFormat::Markdown => Ok(Self::catalog_markdown(apps)),
            ExportFormat::Text => Ok(Self::catalog_text(apps)),
        }
    }

    pub fn scan_report(app_name: &str, report: &ScanReport, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => to_json(report),
            ExportFormat::Csv => {
                let mut output = String::from("Check,Result,Details\n");
                for check in &report.details {
                    output.push_str(&format!(
                        "{},{},{}\n",
                        escape_csv(&check.check),
                        check.result,
                        escape_csv(&check.details)
                    ));
                }
                Ok(output)
            }
            ExportFormat::Markdown => {
                let mut output = format!("# Security Scan: {}\n\n", app_name);
                output.push_str(&format!("**Status:** {}\n\n", report.status));
                output.push_str(&generated_line());
                output.push_str("| Check | Result | Details |\n|-------|--------|---------|\n");
                for check in &report.details {
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        escape_markdown(&check.check),
                        check.result,
                        escape_markdown(&check.details)
                    ));
                }
                Ok(output)
            }
            ExportFormat::Text => {
                let mut output = format!("Scan of {}: {}\n", app_name, report.status);
                for check in &report.details {
                    output.push_str(&format!(
                        "  [{}] {}\n      {}\n",
                        check.result, check.check, check.details
                    ));
                }
                Ok(output)
            }
        }
    }

    pub fn threat_report(
        file_name: &str,
        report: &ThreatScanReport,
        format: ExportFormat,
    ) -> Result<String> {
        match format {
            ExportFormat::Json => to_json(report),
            ExportFormat::Csv => {
                let mut output = String::from("Engine,Result,Threat Name\n");
                for detail in &report.details {
                    output.push_str(&format!(
                        "{},{},{}\n",
                        escape_csv(&detail.engine),
                        verdict_label(detail.result),
                        escape_csv(detail.threat_name.as_deref().unwrap_or(""))
                    ));
                }
                Ok(output)
            }
            ExportFormat::Markdown => {
                let mut output = format!("# Upload Scan: {}\n\n", file_name);
                output.push_str(&format!(
                    "**Status:** {} ({} / {} engines detected threats)\n\n",
                    report.status, report.positives, report.total
                ));
                output.push_str(&generated_line());
                output.push_str("| Engine | Result |\n|--------|--------|\n");
                for detail in &report.details {
                    let result = match detail.result {
                        EngineVerdict::Clean => "Clean".to_string(),
                        EngineVerdict::Detected => format!(
                            "**{}**",
                            escape_markdown(detail.threat_name.as_deref().unwrap_or("detected"))
                        ),
                    };
                    output.push_str(&format!(
                        "| {} | {} |\n",
                        escape_markdown(&detail.engine),
                        result
                    ));
                }
                Ok(output)
            }
            ExportFormat::Text => {
                let mut output = format!(
                    "Scan Complete: {}\n{} / {} engines detected threats.\n",
                    report.status, report.positives, report.total
                );
                for detail in &report.details {
                    let result = match detail.result {
                        EngineVerdict::Clean => "Clean",
                        EngineVerdict::Detected => {
                            detail.threat_name.as_deref().unwrap_or("detected")
                        }
                    };
                    output.push_str(&format!("  {:<24} {}\n", detail.engine, result));
                }
                Ok(output)
            }
        }
    }

    fn catalog_csv(apps: &[&CatalogEntry]) -> String {
        let mut output = String::from("Name,Version,Category,Description,Icon URL,Uploaded\n");
        for app in apps {
            output.push_str(&format!(
                "{},{},{},{},{},{}\n",
                escape_csv(&app.name),
                escape_csv(&app.version),
                escape_csv(&app.category),
                escape_csv(&app.description),
                app.icon_url,
                app.is_uploaded
            ));
        }
        output
    }

    fn catalog_markdown(apps: &[&CatalogEntry]) -> String {
        let mut output = String::from("# App Catalog\n\n");
        output.push_str(&format!("Total apps: {}\n\n", apps.len()));
        output.push_str(&generated_line());
        output.push_str("---\n\n");

        for app in apps {
            output.push_str(&format!("## {}\n\n", escape_markdown(&app.name)));
            output.push_str(&format!("{}\n\n", app.description));
            output.push_str(&format!(
                "- **Version:** {}\n- **Category:** {}\n- **Icon:** {}\n",
                app.version, app.category, app.icon_url
            ));
            if app.is_uploaded {
                output.push_str("- **Uploaded by user**\n");
            }
            output.push('\n');
        }
        output
    }

    fn catalog_text(apps: &[&CatalogEntry]) -> String {
        if apps.is_empty() {
            return "No apps found.\n".to_string();
        }

        let mut output = String::new();
        for app in apps {
            let marker = if app.is_uploaded { " (uploaded)" } else { "" };
            output.push_str(&format!(
                "{} v{} [{}]{}\n    {}\n",
                app.name, app.version, app.category, marker, app.description
            ));
        }
        output
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Error::from)
}

fn generated_line() -> String {
    format!("*Generated {}*\n\n", Utc::now().format("%Y-%m-%d %H:%M UTC"))
}

fn verdict_label(verdict: EngineVerdict) -> &'static str {
    match verdict {
        EngineVerdict::Clean => "clean",
        EngineVerdict::Detected => "detected",
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|")
}
