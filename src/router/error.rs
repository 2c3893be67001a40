use thiserror::Error;

/// Errors raised while building a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for route table construction
pub type RouteResult<T> = Result<T, RouteError>;
