use crate::handler::{Request, Response};
use crate::methods::RouteMethod;
use percent_encoding::percent_decode_str;
use smallvec::SmallVec;
use std::{fmt, sync::Arc};

mod error;
mod middleware;
mod pattern;
mod preprocess;
mod route;

pub use error::{RouteError, RouteResult};
pub use middleware::{Collapsed, Middlewares};
pub use pattern::Pattern;
pub use preprocess::Preprocess;
pub use route::Route;

type NotFoundHandler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

/// An ordered route table sharing one state type.
///
/// Routes are scanned in declaration order. The first route whose pattern
/// matches *and* whose method fits wins; path matches with the wrong method
/// are remembered so the router can answer `405` with an `Allow` header
/// instead of `404`.
///
/// The table is read-only while serving, so a fully built router can be put
/// behind an `Arc` and served from any number of tasks.
pub struct Router<T> {
    routes: Vec<Route<T>>,
    preprocessors: Vec<Arc<dyn Preprocess>>,
    not_found: Option<NotFoundHandler>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            preprocessors: Vec::new(),
            not_found: None,
        }
    }
}

impl<T: 'static> Router<T> {
    pub fn new(routes: Vec<Route<T>>) -> Self {
        Self {
            routes,
            ..Self::default()
        }
    }

    pub fn routes(&self) -> &[Route<T>] {
        &self.routes
    }

    /// Swaps in a whole new table; individual routes are never edited in place.
    pub fn set_routes(&mut self, routes: Vec<Route<T>>) -> Vec<Route<T>> {
        std::mem::replace(&mut self.routes, routes)
    }

    /// Registers a rewrite applied to every request before matching.
    pub fn with_preprocessor<P: Preprocess>(mut self, preprocessor: P) -> Self {
        self.preprocessors.push(Arc::new(preprocessor));
        self
    }

    /// Replaces the default plain-text `404` response.
    pub fn with_not_found<F>(mut self, not_found: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.not_found = Some(Arc::new(not_found));
        self
    }

    /// Routes `req` and returns whatever response the route, its middleware
    /// or the fallback produced.
    pub fn serve(&self, req: Request) -> Response {
        let req = self
            .preprocessors
            .iter()
            .fold(req, |req, preprocessor| preprocessor.preprocess(req));

        // patterns see the decoded path, so `%20` matches a literal space
        let path = match percent_decode_str(req.uri().path()).decode_utf8() {
            Ok(path) => path.into_owned(),
            Err(err) => {
                log::debug!("{} {} bad path: {}", req.method(), req.uri().path(), err);
                return Response::bad_request();
            }
        };

        let mut allow: SmallVec<[RouteMethod; 4]> = SmallVec::new();

        for route in &self.routes {
            let Some(captures) = route.pattern().captures(&path) else {
                continue;
            };

            if !route.method().allows(req.method()) {
                if !allow.contains(&route.method()) {
                    allow.push(route.method());
                }
                continue;
            }

            log::trace!(
                "{} {} matched {} {}",
                req.method(),
                path,
                route.method(),
                route.pattern()
            );
            return route.dispatch(captures, req);
        }

        if allow.is_empty() {
            log::debug!("{} {} not found", req.method(), path);
            return match &self.not_found {
                Some(not_found) => not_found(&req),
                None => Response::not_found(),
            };
        }

        let allow = allow
            .iter()
            .map(RouteMethod::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        log::debug!(
            "{} {} method not allowed, allow: {}",
            req.method(),
            path,
            allow
        );
        Response::method_not_allowed(&allow)
    }
}

impl<T: 'static> From<Vec<Route<T>>> for Router<T> {
    fn from(routes: Vec<Route<T>>) -> Self {
        Self::new(routes)
    }
}

impl<T: 'static> FromIterator<Route<T>> for Router<T> {
    fn from_iter<I: IntoIterator<Item = Route<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("preprocessors", &self.preprocessors.len())
            .field("custom_not_found", &self.not_found.is_some())
            .finish()
    }
}
