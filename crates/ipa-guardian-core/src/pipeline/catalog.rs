// Catalog generation: prompt, schema and validation
use ipa_guardian_api::Schema;
use reqwest::Url;
use serde::Deserialize;

use super::{parse_json, require_text};
use crate::{models::CatalogEntry, Error, Result};

/// App as the service describes it (no client-side fields)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GeneratedApp {
    name: String,
    version: String,
    description: String,
    category: String,
    icon_url: String,
}

impl From<GeneratedApp> for CatalogEntry {
    fn from(app: GeneratedApp) -> Self {
        CatalogEntry {
            name: app.name,
            version: app.version,
            description: app.description,
            category: app.category,
            icon_url: app.icon_url,
            is_uploaded: false,
        }
    }
}

pub fn prompt(count: usize) -> String {
    format!(
        "Generate a list of {count} popular and diverse fictional iOS apps that could exist. \
         Provide a name, version, description, category, and an icon URL from picsum.photos \
         for each. Ensure variety in categories."
    )
}

pub fn schema() -> Schema {
    Schema::array(Schema::object([
        (
            "name",
            Schema::string().with_description("The name of the application."),
        ),
        (
            "version",
            Schema::string().with_description("A realistic version number, e.g., 3.14.2"),
        ),
        (
            "description",
            Schema::string().with_description("A short, one-sentence description of the app."),
        ),
        (
            "category",
            Schema::string().with_description(
                "The primary category, e.g., Social, Productivity, Games, Utilities.",
            ),
        ),
        (
            "iconUrl",
            Schema::string().with_description(
                "A placeholder image URL from picsum.photos, e.g., https://picsum.photos/200",
            ),
        ),
    ]))
}

pub fn decode(text: &str, expected: usize) -> Result<Vec<CatalogEntry>> {
    let apps: Vec<GeneratedApp> = parse_json(text)?;

    if apps.len() != expected {
        return Err(Error::SchemaViolation(format!(
            "expected {} apps, got {}",
            expected,
            apps.len()
        )));
    }

    for (i, app) in apps.iter().enumerate() {
        validate_app(app).map_err(|e| match e {
            Error::SchemaViolation(msg) => Error::SchemaViolation(format!("app {}: {}", i, msg)),
            other => other,
        })?;
    }

    Ok(apps.into_iter().map(CatalogEntry::from).collect())
}

fn validate_app(app: &GeneratedApp) -> Result<()> {
    require_text(&app.name, "name")?;
    require_text(&app.version, "version")?;
    require_text(&app.description, "description")?;
    require_text(&app.category, "category")?;
    validate_icon_url(&app.icon_url)
}

fn validate_icon_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw)
        .map_err(|e| Error::SchemaViolation(format!("iconUrl {:?} is not a URL: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(()),
        _ => Err(Error::SchemaViolation(format!(
            "iconUrl {:?} is not an http(s) URL",
            raw
        ))),
    }
}
