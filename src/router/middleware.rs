use super::{error::RouteResult, route::Route};
use crate::{
    handler::{Handler, Middleware, MiddlewareResult, Request, Response},
    methods::RouteMethod,
};
use std::{fmt, sync::Arc};

/// An ordered middleware chain for routes sharing the state type `T`.
///
/// The first declared middleware is the outermost one: it runs first on the
/// way in. Routes are built straight off a chain with [`Middlewares::get`] and
/// friends, so a single chain value usually describes one "audience" of
/// routes (public, authenticated, ...).
pub struct Middlewares<T> {
    stack: Vec<Arc<dyn Middleware<T>>>,
}

impl<T> Default for Middlewares<T> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<T> Clone for Middlewares<T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<T> fmt::Debug for Middlewares<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middlewares")
            .field("len", &self.stack.len())
            .finish()
    }
}

impl<T: 'static> Middlewares<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `middleware` as the innermost member.
    pub fn with<M: Middleware<T>>(mut self, middleware: M) -> Self {
        self.stack.push(Arc::new(middleware));
        self
    }

    pub fn push<M: Middleware<T>>(&mut self, middleware: M) -> &mut Self {
        self.stack.push(Arc::new(middleware));
        self
    }

    /// A new chain running `self` first and then `inner`; neither input changes.
    pub fn extend(&self, inner: &Middlewares<T>) -> Self {
        let mut stack = Vec::with_capacity(self.stack.len() + inner.stack.len());
        stack.extend(self.stack.iter().cloned());
        stack.extend(inner.stack.iter().cloned());
        Self { stack }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Folds the chain into one middleware with the same observable order.
    pub fn collapse(&self) -> Collapsed<T> {
        Collapsed {
            chain: self.stack.iter().cloned().collect(),
        }
    }
}

impl<T: 'static> FromIterator<Arc<dyn Middleware<T>>> for Middlewares<T> {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Middleware<T>>>>(iter: I) -> Self {
        Self {
            stack: iter.into_iter().collect(),
        }
    }
}

macro_rules! generate_methods {
    (
        methods: [$($name:ident => $method:expr),* $(,)?]
    ) => {
        impl<T: 'static> Middlewares<T> {
            $(
                #[doc = concat!("Builds a `", stringify!($name), "` route guarded by this chain.")]
                pub fn $name<F>(&self, pattern: &str, factory: F) -> RouteResult<Route<T>>
                where
                    F: Fn(Vec<String>) -> (T, Handler) + Send + Sync + 'static,
                {
                    Route::new($method, pattern, factory, self)
                }
            )*
        }
    };
}

generate_methods! {
    methods: [
        get => RouteMethod::Get,
        post => RouteMethod::Post,
        put => RouteMethod::Put,
        del => RouteMethod::Delete,
        all => RouteMethod::Any,
    ]
}

/// A whole chain behaving as a single middleware.
pub struct Collapsed<T> {
    chain: Arc<[Arc<dyn Middleware<T>>]>,
}

impl<T> Clone for Collapsed<T> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
        }
    }
}

impl<T> fmt::Debug for Collapsed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collapsed")
            .field("len", &self.chain.len())
            .finish()
    }
}

impl<T: 'static> Middleware<T> for Collapsed<T> {
    fn call(&self, state: &T, mut res: Response, mut req: Request) -> MiddlewareResult {
        for middleware in self.chain.iter() {
            match middleware.call(state, res, req) {
                MiddlewareResult::Next(next_res, next_req) => {
                    res = next_res;
                    req = next_req;
                }
                stopped @ MiddlewareResult::Stop(_) => return stopped,
            }
        }

        MiddlewareResult::Next(res, req)
    }
}
