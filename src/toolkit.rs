//! Ready-made pieces for building a router: a request logging middleware and
//! the HTML form method override.

use crate::application::App;
use crate::router::Router;

mod logging;
mod method_override;

pub use logging::RequestLogger;
pub use method_override::MethodOverride;

/// Publishes a fully built `router` for serving with the default config.
pub fn app<T: 'static>(router: Router<T>) -> App<T> {
    App::new(router)
}
