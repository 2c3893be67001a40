use super::{
    error::RouteResult,
    middleware::{Collapsed, Middlewares},
    pattern::Pattern,
};
use crate::{
    handler::{
        Handler, HandlerFactory, Middleware, MiddlewareResult, Request, Response, RouteCaptures,
    },
    methods::RouteMethod,
};
use std::{fmt, sync::Arc};

/// One dispatchable entry of a router: method, pattern, factory and the
/// collapsed middleware guarding it.
pub struct Route<T> {
    method: RouteMethod,
    pattern: Pattern,
    factory: HandlerFactory<T>,
    middleware: Collapsed<T>,
}

impl<T: 'static> Route<T> {
    /// Compiles `pattern` and collapses `middlewares`.
    ///
    /// A malformed pattern is a configuration error: it is returned instead of
    /// producing a route that never matches.
    pub fn new<F>(
        method: RouteMethod,
        pattern: &str,
        factory: F,
        middlewares: &Middlewares<T>,
    ) -> RouteResult<Self>
    where
        F: Fn(Vec<String>) -> (T, Handler) + Send + Sync + 'static,
    {
        Ok(Self {
            method,
            pattern: Pattern::new(pattern)?,
            factory: Arc::new(factory),
            middleware: middlewares.collapse(),
        })
    }

    pub fn method(&self) -> RouteMethod {
        self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Builds the request state, runs the middleware and, unless vetoed, the
    /// handler.
    pub(crate) fn dispatch(&self, captures: Vec<String>, mut req: Request) -> Response {
        let (state, handler) = (self.factory)(captures.clone());
        req.extensions_mut().insert(RouteCaptures::new(captures));

        match self.middleware.call(&state, Response::new(), req) {
            MiddlewareResult::Next(mut res, req) => {
                handler(&mut res, req);
                res
            }
            MiddlewareResult::Stop(res) => {
                log::trace!("{} {} stopped by middleware", self.method, self.pattern);
                res
            }
        }
    }
}

impl<T> fmt::Debug for Route<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("middleware", &self.middleware)
            .finish()
    }
}
