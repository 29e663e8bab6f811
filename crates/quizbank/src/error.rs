#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid collection {path}: {reason}")]
    InvalidCollection { path: String, reason: String },

    #[error("Collection {path} failed verification: {problems}")]
    Unhealthy { path: String, problems: String },

    #[error("Cannot read PDF {path}: {reason}")]
    Pdf { path: String, reason: String },
}
