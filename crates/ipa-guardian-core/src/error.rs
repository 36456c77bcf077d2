use thiserror::Error;

/// Which generator a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationTarget {
    Catalog,
    Scan,
    ThreatScan,
}

impl std::fmt::Display for GenerationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationTarget::Catalog => write!(f, "Failed to fetch app data from Gemini API"),
            GenerationTarget::Scan => write!(f, "Failed to generate scan result from Gemini API"),
            GenerationTarget::ThreatScan => {
                write!(f, "Failed to generate VirusTotal scan result from Gemini API")
            }
        }
    }
}

/// All the ways IPA Guardian can fail
///
/// `Generation` is the one error the three generators ever return. The
/// lower-level variants show up as its source.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Malformed JSON: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Response does not match the schema: {0}")]
    SchemaViolation(String),

    #[error("{target}: {source}")]
    Generation {
        target: GenerationTarget,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Approval rejected: {0}")]
    ApprovalRejected(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub fn generation(target: GenerationTarget, source: Error) -> Self {
        Error::Generation {
            target,
            source: Box::new(source),
        }
    }

    /// The generator this error came from, if any
    pub fn generation_target(&self) -> Option<GenerationTarget> {
        match self {
            Error::Generation { target, .. } => Some(*target),
            _ => None,
        }
    }
}
