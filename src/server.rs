use crate::error::ServerError;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

pub(crate) struct Server;

impl Server {
    /// Accepts connections on `addr` until Ctrl+C, serving each one with a
    /// fresh service from `make_service`.
    ///
    /// `on_bound` runs once the listener is bound, with the address actually
    /// taken; it never runs when binding fails.
    pub async fn bind<F, S, C>(
        addr: SocketAddr,
        make_service: F,
        on_bound: C,
    ) -> Result<(), ServerError>
    where
        F: Fn() -> S,
        C: FnOnce(SocketAddr),
        S: Service<Request<Incoming>, Response = Response<Full<Bytes>>, Error = Infallible>
            + Send
            + 'static,
        S::Future: Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        on_bound(listener.local_addr().unwrap_or(addr));

        let mut shutdown = tokio::spawn(async {
            match signal::ctrl_c().await {
                Ok(()) => log::info!("🛑 Received Ctrl+C, shutting down server..."),
                Err(err) => {
                    log::error!("failed to listen for Ctrl+C: {}", err);
                    std::future::pending::<()>().await;
                }
            }
        });

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(err) => {
                            log::error!("Accept error: {}", err);
                            continue;
                        }
                    };
                    let service = make_service();
                    let io = TokioIo::new(stream);

                    tokio::spawn(async move {
                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                            log::error!("Connection error from {}: {}", peer, err);
                        }
                    });
                }
                _ = &mut shutdown => {
                    break;
                }
            }
        }

        Ok(())
    }
}
