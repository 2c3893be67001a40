use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Configuration for serving a router over HTTP
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to listen on
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Largest request body accepted before routing; larger bodies get `413`
    pub max_body_bytes: usize,
    /// Whether to log method, path, status and duration of every request
    pub log_timings: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            max_body_bytes: 2 * 1024 * 1024, // 2 MB
            log_timings: cfg!(debug_assertions),
        }
    }
}

impl AppConfig {
    pub fn host(mut self, host: impl Into<IpAddr>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn log_timings(mut self, enabled: bool) -> Self {
        self.log_timings = enabled;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
