use crate::handler::{FormData, Request};
use crate::router::Preprocess;
use hyper::{Method, header::CONTENT_TYPE};
use log::{debug, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Lets HTML forms, which can only `GET` and `POST`, reach `PUT` and `DELETE`
/// routes through a hidden form field.
///
/// For url-encoded form bodies the body is decoded into a [`FormData`]
/// request extension. A non-empty override field replaces the request method
/// before routing; with `strip_field` set (the default) the field is then
/// dropped from the decoded form.
#[derive(Debug, Clone)]
pub struct MethodOverride {
    field: String,
    strip_field: bool,
}

impl Default for MethodOverride {
    fn default() -> Self {
        Self {
            field: "_method".to_string(),
            strip_field: true,
        }
    }
}

impl MethodOverride {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the override from `field` instead of `_method`.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Whether the override field is removed from the decoded form.
    pub fn strip_field(mut self, strip: bool) -> Self {
        self.strip_field = strip;
        self
    }

    fn is_form(req: &Request) -> bool {
        req.headers()
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
    }
}

impl Preprocess for MethodOverride {
    fn preprocess(&self, mut req: Request) -> Request {
        if !Self::is_form(&req) {
            return req;
        }

        let mut form = match req.extensions_mut().remove::<FormData>() {
            Some(form) => form,
            None => FormData::parse(req.body()),
        };

        let requested = form
            .get(&self.field)
            .filter(|value| !value.is_empty())
            .map(str::to_ascii_uppercase);

        if let Some(requested) = requested {
            match Method::from_bytes(requested.as_bytes()) {
                Ok(method) => {
                    debug!(
                        "{} {} overridden to {}",
                        req.method(),
                        req.uri().path(),
                        method
                    );
                    *req.method_mut() = method;
                    if self.strip_field {
                        form.remove(&self.field);
                    }
                }
                Err(_) => warn!("ignoring invalid method override `{}`", requested),
            }
        }

        req.extensions_mut().insert(form);
        req
    }
}
