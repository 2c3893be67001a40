use std::net::SocketAddr;
use thiserror::Error;

pub use crate::handler::response::error::ResponseError;
pub use crate::router::RouteError;

/// Errors raised by the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
