use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Not found: {path}")]
    NotFound { path: String },
    #[error("HTTP {status} from {path}: {body}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}
