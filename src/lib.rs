//! A minimal HTTP request router.
//!
//! Routes pair a method and an anchored regular expression with a handler
//! factory; the factory turns the pattern's captures into a per-request state
//! and the handler that uses it. Each route carries a collapsed middleware
//! chain that runs outermost-first and can stop the request before the
//! handler. The router scans routes in declaration order and answers `404`
//! or `405` (with `Allow`) when nothing fits.
//!
//! ```no_run
//! use lever::{app, handler::{handler, Response, Request}, router::{Middlewares, Router}};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let public = Middlewares::<String>::new();
//! let router = Router::new(vec![
//!     public.get("/items/([0-9]+)", |captures: Vec<String>| {
//!         let id = captures[0].clone();
//!         (id.clone(), handler(move |res: &mut Response, _req: Request| {
//!             res.send(id);
//!         }))
//!     })?,
//! ]);
//!
//! app(router).listen(|addr| println!("listening on {addr}")).await?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod error;
pub mod handler;
pub mod methods;
pub mod router;
pub mod toolkit;

mod server;

pub use application::App;
pub use config::AppConfig;
pub use methods::RouteMethod;
pub use router::{Middlewares, Route, Router};
pub use toolkit::app;
