use bytes::BytesMut;
use http_body_util::Full;
use hyper::{
    HeaderMap, Response as HyperResponse, StatusCode,
    body::Bytes,
    header::{self, HeaderName, HeaderValue, IntoHeaderName},
};
use std::str::FromStr;

pub mod error;

use error::ResponseError;

/// The response sink threaded through middleware and handlers.
///
/// It buffers status, headers and body; the transport turns it into a hyper
/// response once dispatch returns.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    body: BytesMut,
    headers: HeaderMap,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Response {
            status: StatusCode::OK,
            body: BytesMut::with_capacity(512),
            headers: HeaderMap::with_capacity(8),
        }
    }

    pub fn bad_request() -> Self {
        let mut res = Self::new();
        res.status(StatusCode::BAD_REQUEST).send("400 Bad Request");
        res
    }

    /// Plain-text `404 Not Found`.
    pub fn not_found() -> Self {
        let mut res = Self::new();
        res.status(StatusCode::NOT_FOUND).send("404 Not Found");
        res
    }

    /// `405 Method Not Allowed` advertising `allow` in the `Allow` header.
    pub fn method_not_allowed(allow: &str) -> Self {
        let mut res = Self::new();
        if let Ok(value) = HeaderValue::from_str(allow) {
            res.set(header::ALLOW, value);
        }
        res.status(StatusCode::METHOD_NOT_ALLOWED)
            .send("405 Method Not Allowed");
        res
    }

    pub fn payload_too_large() -> Self {
        let mut res = Self::new();
        res.status(StatusCode::PAYLOAD_TOO_LARGE)
            .send("413 Payload Too Large");
        res
    }

    pub fn internal_error() -> Self {
        let mut res = Self::new();
        res.status(StatusCode::INTERNAL_SERVER_ERROR)
            .send("Internal Server Error");
        res
    }

    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn status_code(&mut self, status: u16) -> Result<&mut Self, ResponseError> {
        self.status =
            StatusCode::from_u16(status).map_err(|_| ResponseError::InvalidStatusCode(status))?;
        Ok(self)
    }

    pub fn get_status(&self) -> StatusCode {
        self.status
    }

    pub fn set<K: IntoHeaderName, V: Into<HeaderValue>>(&mut self, key: K, val: V) -> &mut Self {
        self.headers.insert(key, val.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        HeaderName::from_str(key)
            .ok()
            .and_then(|k| self.headers.get(&k))
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Appends to the body.
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.body.extend_from_slice(data.as_ref());
        self
    }

    /// Replaces the body, guessing a content type when none is set.
    pub fn send(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        let data = data.as_ref();

        self.body.clear();
        self.body.extend_from_slice(data);

        if !self.headers.contains_key(header::CONTENT_TYPE) {
            let guess = if std::str::from_utf8(data).is_ok() {
                "text/plain; charset=utf-8"
            } else {
                "application/octet-stream"
            };
            self.set(header::CONTENT_TYPE, HeaderValue::from_static(guess));
        }

        self
    }

    pub fn json<T: serde::Serialize>(&mut self, value: T) -> Result<&mut Self, ResponseError> {
        let json = serde_json::to_vec(&value)?;
        self.set(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(self.send(json))
    }

    pub fn redirect(&mut self, location: &str) -> Result<&mut Self, ResponseError> {
        self.status = StatusCode::FOUND;
        self.set(header::LOCATION, HeaderValue::from_str(location)?);
        self.body.clear();
        Ok(self)
    }

    pub fn r#type(&mut self, mime: impl Into<HeaderValue>) -> &mut Self {
        self.set(header::CONTENT_TYPE, mime);
        self
    }

    pub fn try_into_hyper(self) -> Result<HyperResponse<Full<Bytes>>, ResponseError> {
        let mut response = HyperResponse::builder()
            .status(self.status)
            .body(Full::new(self.body.freeze()))?;
        *response.headers_mut() = self.headers;
        Ok(response)
    }

    pub fn into_hyper(self) -> HyperResponse<Full<Bytes>> {
        self.try_into_hyper().unwrap_or_else(|e| {
            log::error!("failed to build response: {}", e);
            let mut fallback = HyperResponse::new(Full::new(Bytes::from_static(
                b"Internal Server Error",
            )));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

impl From<Response> for HyperResponse<Full<Bytes>> {
    fn from(resp: Response) -> Self {
        resp.into_hyper()
    }
}
