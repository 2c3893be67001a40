use crate::handler::{
    Request, Response,
    middleware::{Middleware, MiddlewareResult, next},
};
use hyper::header::USER_AGENT;
use log::info;

/// Middleware that logs each routed request.
///
/// Logs the method, path, and user agent before the handler runs. It never
/// stops the chain and works with any router state type.
///
/// Example log output:
/// ```text
/// GET /items/42 - User-Agent: curl/8.5.0
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl<T> Middleware<T> for RequestLogger {
    fn call(&self, _state: &T, res: Response, req: Request) -> MiddlewareResult {
        info!(
            "{} {} - User-Agent: {}",
            req.method(),
            req.uri().path(),
            req.headers()
                .get(USER_AGENT)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("Unknown")
        );
        next(res, req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_logger_passes_pair_through() {
        let mut res = Response::new();
        res.write("kept");
        let result = RequestLogger.call(&42u8, res, Request::new(Bytes::new()));

        match result {
            MiddlewareResult::Next(res, _) => assert_eq!(res.body(), b"kept"),
            MiddlewareResult::Stop(_) => panic!("logger must not stop"),
        }
    }
}
