use crate::config::AppConfig;
use crate::error::ServerError;
use crate::handler::{Request as LeverRequest, Response as LeverResponse};
use crate::router::Router;
use crate::server::Server;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response};
use log::{error, info, warn};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

/// A router published for serving.
///
/// Cloning is cheap; every clone shares the same read-only route table.
pub struct App<T> {
    router: Arc<Router<T>>,
    config: Arc<AppConfig>,
}

impl<T> Clone for App<T> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T> std::fmt::Debug for App<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("router", &self.router)
            .field("config", &self.config)
            .finish()
    }
}

impl<T: 'static> App<T> {
    pub fn new(router: Router<T>) -> Self {
        Self {
            router: Arc::new(router),
            config: Arc::new(AppConfig::default()),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn router(&self) -> &Router<T> {
        &self.router
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Collects the body of `req`, routes it and converts the result.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let start = Instant::now();
        let (parts, body) = req.into_parts();

        let bytes = match Limited::new(body, self.config.max_body_bytes).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
                warn!(
                    "{} {} body exceeds {} bytes",
                    parts.method, parts.uri, self.config.max_body_bytes
                );
                return LeverResponse::payload_too_large().into_hyper();
            }
            Err(err) => {
                error!("failed to read request body: {}", err);
                return LeverResponse::bad_request().into_hyper();
            }
        };

        let method = parts.method.clone();
        let path = parts.uri.path().to_owned();
        let res = self.router.serve(LeverRequest::from_parts(parts, bytes));

        if self.config.log_timings {
            info!(
                "{} {} {} ({} ms)",
                method,
                path,
                res.get_status().as_u16(),
                start.elapsed().as_millis()
            );
        }

        res.into_hyper()
    }

    /// Binds the configured address and serves until Ctrl+C.
    ///
    /// `callback` receives the bound address once the listener is up, so a
    /// port of `0` reports the port the OS picked.
    pub async fn listen<F: FnOnce(SocketAddr)>(self, callback: F) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let app = self;

        let make_service = move || app.clone();

        Server::bind(addr, make_service, callback).await
    }
}

impl<T: 'static> Service<Request<Incoming>> for App<T> {
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let app = self.clone();

        Box::pin(async move { Ok(app.handle(req).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler;
    use crate::router::Middlewares;
    use hyper::StatusCode;
    use std::net::{Ipv4Addr, TcpListener};

    fn app() -> App<()> {
        let chain = Middlewares::<()>::new();
        let router = Router::new(vec![
            chain
                .post("/echo", |_| {
                    (
                        (),
                        handler(|res, req: LeverRequest| {
                            res.send(req.body().clone());
                        }),
                    )
                })
                .unwrap(),
        ]);
        App::new(router).with_config(AppConfig::default().max_body_bytes(8))
    }

    fn post(body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    #[tokio::test]
    async fn test_body_reaches_the_handler() {
        let res = app().handle(post("hi")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hi");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected_before_routing() {
        let res = app().handle(post("far too long a body")).await;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_listen_callback_skipped_when_bind_fails() {
        let taken = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = taken.local_addr().unwrap().port();
        let config = AppConfig::default().host(Ipv4Addr::LOCALHOST).port(port);

        let mut announced = false;
        let result = app()
            .with_config(config)
            .listen(|_| announced = true)
            .await;

        assert!(matches!(result, Err(ServerError::Bind { .. })));
        assert!(!announced, "callback ran although nothing was bound");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let req = Request::builder()
            .uri("/nope")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let res = app().handle(req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
