use bytes::Bytes;
use hyper::Request as HRequest;

/// Aliased request type. The body is collected before routing.
pub type Request = HRequest<Bytes>;

/// Positional captures of the route that matched the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteCaptures(Vec<String>);

impl RouteCaptures {
    pub fn new(captures: Vec<String>) -> Self {
        Self(captures)
    }

    /// Returns the capture at `index`, counting from zero.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Decoded `application/x-www-form-urlencoded` body, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn parse(body: &[u8]) -> Self {
        Self(form_urlencoded::parse(body).into_owned().collect())
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Drops every value stored under `key`.
    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Accessors for the data the router attaches to a request.
pub trait RequestExt {
    /// Captures of the matched route; set right before the middleware chain runs.
    fn captures(&self) -> Option<&RouteCaptures>;

    /// Form fields, present once a preprocessor decoded the body.
    fn form(&self) -> Option<&FormData>;
}

impl RequestExt for Request {
    fn captures(&self) -> Option<&RouteCaptures> {
        self.extensions().get::<RouteCaptures>()
    }

    fn form(&self) -> Option<&FormData> {
        self.extensions().get::<FormData>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_parse_keeps_order_and_decodes() {
        let form = FormData::parse(b"name=Ada+Lovelace&_method=put&name=second");
        assert_eq!(form.get("name"), Some("Ada Lovelace"));
        assert_eq!(form.get("_method"), Some("put"));
        assert_eq!(form.len(), 3);
    }

    #[test]
    fn test_form_remove_drops_all_values() {
        let mut form = FormData::parse(b"a=1&b=2&a=3");
        form.remove("a");
        assert!(!form.contains("a"));
        assert_eq!(form.iter().collect::<Vec<_>>(), vec![("b", "2")]);
    }

    #[test]
    fn test_request_ext_reads_extensions() {
        let mut req = Request::new(Bytes::new());
        assert!(req.captures().is_none());
        req.extensions_mut()
            .insert(RouteCaptures::new(vec!["42".to_string()]));
        assert_eq!(req.captures().and_then(|c| c.get(0)), Some("42"));
    }
}
