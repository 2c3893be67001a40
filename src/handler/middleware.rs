use super::{Request, Response};

/// What a middleware hands back to the chain.
#[derive(Debug)]
pub enum MiddlewareResult {
    /// Keep going with this (possibly replaced) pair.
    Next(Response, Request),
    /// The middleware already produced the final response; nothing else runs.
    Stop(Response),
}

/// Trait for middleware over a per-request state `T`.
///
/// A single value can be shared by every route whose router uses the same `T`.
pub trait Middleware<T>: Send + Sync + 'static {
    fn call(&self, state: &T, res: Response, req: Request) -> MiddlewareResult;
}

pub fn next(res: Response, req: Request) -> MiddlewareResult {
    MiddlewareResult::Next(res, req)
}

pub fn stop(res: Response) -> MiddlewareResult {
    MiddlewareResult::Stop(res)
}

impl MiddlewareResult {
    pub fn is_next(&self) -> bool {
        matches!(self, MiddlewareResult::Next(..))
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, MiddlewareResult::Stop(_))
    }
}

/// Blanket impl for closures or functions that match the signature.
impl<T, F> Middleware<T> for F
where
    F: Fn(&T, Response, Request) -> MiddlewareResult + Send + Sync + 'static,
{
    fn call(&self, state: &T, res: Response, req: Request) -> MiddlewareResult {
        (self)(state, res, req)
    }
}
