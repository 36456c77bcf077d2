use anyhow::Context;
use clap::Parser;
use ipa_guardian_core::{
    Config, ExportFormat, Exporter, GeminiProvider, GenerationPipeline, Storefront, UploadReview,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ipa-guardian")]
#[command(version, about = "Simulated iOS app store with AI-generated security scans", long_about = None)]
struct Cli {
    /// Model identifier to request content from
    #[arg(long, global = true)]
    model: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write output to a file instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
    Markdown,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => ExportFormat::Text,
            Format::Json => ExportFormat::Json,
            Format::Csv => ExportFormat::Csv,
            Format::Markdown => ExportFormat::Markdown,
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Generate the app catalog
    Catalog {
        /// Only show apps whose name or category contains this term
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Run a simulated security scan of an app
    Scan {
        /// App name
        name: String,
    },
    /// Threat-scan an uploaded .ipa package
    Upload {
        /// Package file name
        file: String,

        /// Add the app to the catalog if the scan is clean
        #[arg(long)]
        approve: bool,

        /// Submit the package for manual review if threats were found
        #[arg(long)]
        submit: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ipa_guardian=info,ipa_guardian_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load config")?;
    config.apply_env();
    if let Some(model) = cli.model.clone() {
        config.gemini.model = model;
    }

    // No credential, no point going further
    let provider = GeminiProvider::from_config(&config.gemini)?;
    tracing::info!(model = provider.model(), "Using generation service");

    let pipeline =
        GenerationPipeline::new(Arc::new(provider)).with_catalog_size(config.catalog.size);

    let format = match &cli.output {
        Some(path) => ExportFormat::from_path(path).unwrap_or(cli.format.into()),
        None => cli.format.into(),
    };

    let rendered = match cli.command {
        Commands::Catalog { search } => {
            let storefront = Storefront::load(pipeline).await;
            if let Some(message) = storefront.load_error() {
                anyhow::bail!("{}", message);
            }
            let apps = storefront.filter(search.as_deref().unwrap_or(""));
            Exporter::catalog(&apps, format)?
        }
        Commands::Scan { name } => {
            tracing::info!("Scanning {}", name);
            let storefront = Storefront::new(pipeline);
            let report = storefront.scan_app(&name).await;
            Exporter::scan_report(&name, &report, format)?
        }
        Commands::Upload {
            file,
            approve,
            submit,
        } => run_upload(pipeline, &file, approve, submit, format).await?,
    };

    match cli.output {
        Some(path) => {
            Exporter::write_to_file(&rendered, &path)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

async fn run_upload(
    pipeline: GenerationPipeline,
    file: &str,
    approve: bool,
    submit: bool,
    format: ExportFormat,
) -> anyhow::Result<String> {
    let mut review = UploadReview::new(file)?;
    let report = review
        .scan(&pipeline)
        .await
        .with_context(|| ipa_guardian_core::upload::UPLOAD_SCAN_FAILED)?
        .clone();

    let mut rendered = Exporter::threat_report(review.file_name(), &report, format)?;

    if report.is_clean() && approve {
        let entry = review.approve()?;
        let mut storefront = Storefront::new(pipeline);
        storefront.add_uploaded(entry);
        rendered.push_str(&format!(
            "\nApproved: {} added to the catalog.\n",
            storefront.apps()[0].name
        ));
    } else if !report.is_clean() && submit {
        review.submit_for_review()?;
        rendered.push_str("\nSubmitted for review!\n");
    } else if approve || submit {
        tracing::warn!(
            status = %report.status,
            "Requested action does not apply to this scan result"
        );
    }

    Ok(rendered)
}
