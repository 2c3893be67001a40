use crate::handler::Request;

/// A request rewrite applied before route matching.
///
/// Preprocessors run in registration order and may change anything routing
/// looks at, such as the method or the path.
pub trait Preprocess: Send + Sync + 'static {
    fn preprocess(&self, req: Request) -> Request;
}

impl<F> Preprocess for F
where
    F: Fn(Request) -> Request + Send + Sync + 'static,
{
    fn preprocess(&self, req: Request) -> Request {
        (self)(req)
    }
}
