use hyper::Method;
use std::fmt;

/// The method token a route is declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
    /// `*`, matches every request method.
    Any,
}

impl RouteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Delete => "DELETE",
            RouteMethod::Any => "*",
        }
    }

    /// Whether a request made with `method` can be served by this token.
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            RouteMethod::Any => true,
            RouteMethod::Get => *method == Method::GET,
            RouteMethod::Post => *method == Method::POST,
            RouteMethod::Put => *method == Method::PUT,
            RouteMethod::Delete => *method == Method::DELETE,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_allows_everything() {
        for method in [Method::GET, Method::PATCH, Method::OPTIONS, Method::DELETE] {
            assert!(RouteMethod::Any.allows(&method));
        }
    }

    #[test]
    fn test_concrete_tokens_are_exact() {
        assert!(RouteMethod::Get.allows(&Method::GET));
        assert!(!RouteMethod::Get.allows(&Method::HEAD));
        assert!(!RouteMethod::Put.allows(&Method::POST));
    }

    #[test]
    fn test_display_uses_wire_tokens() {
        assert_eq!(RouteMethod::Any.to_string(), "*");
        assert_eq!(RouteMethod::Post.to_string(), "POST");
    }
}
