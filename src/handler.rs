use std::sync::Arc;

pub mod middleware;
pub mod request;
pub mod response;

pub use middleware::{Middleware, MiddlewareResult};
pub use request::{FormData, Request, RequestExt, RouteCaptures};
pub use response::Response;

/// Terminal handler of a route. Runs at most once, after the middleware chain.
pub type Handler = Box<dyn FnOnce(&mut Response, Request)>;

/// Builds the per-request state and the handler closing over it from the
/// ordered captures of the matched pattern.
pub type HandlerFactory<T> = Arc<dyn Fn(Vec<String>) -> (T, Handler) + Send + Sync>;

/// Boxes a closure into a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: FnOnce(&mut Response, Request) + 'static,
{
    Box::new(f)
}
