use reqwest::StatusCode;
use thiserror::Error;

/// Failure while retrieving or reading a page for the excerpt.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("could not read the body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failure of the completion service call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion service answered with HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("completion response was malformed: {0}")]
    MalformedResponse(String),

    #[error("API key cannot be sent as a header: {0}")]
    InvalidApiKey(String),
}

/// Everything that can stop one generation action.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("neither a URL nor manual text was supplied")]
    EmptyInput,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a whole number of seconds, got `{value}`")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be between {min} and {max} seconds, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{0} is not usable as an HTTP header value")]
    InvalidApiKey(&'static str),
}
