use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Missing required feature '{feature}'")]
    MissingFeature { feature: String },

    #[error("No viable candidate: {detail}")]
    NoViableCandidate { detail: String },

    #[error("Malformed offer catalog: column '{column}': {detail}")]
    MalformedCatalog { column: String, detail: String },

    #[error("Catalog read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
