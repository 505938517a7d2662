//! Description of one logical HTTP request.

use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;

use super::error::UnsupportedMethod;

/// Method, URL, headers and optional JSON payload of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    method: Method,
    url: String,
    headers: BTreeMap<String, String>,
    json: Option<serde_json::Value>,
}

impl RequestSpec {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            json: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Adds a header, replacing any previous value for the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Attaches a JSON payload serialized from `body`.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.json = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attaches an already built JSON value as the payload.
    pub fn payload_value(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn header_map(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.json.as_ref()
    }
}

/// Parses a standard HTTP verb, case-insensitively.
pub fn parse_method(method: &str) -> Result<Method, UnsupportedMethod> {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "HEAD" => Ok(Method::HEAD),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "PATCH" => Ok(Method::PATCH),
        "OPTIONS" => Ok(Method::OPTIONS),
        "CONNECT" => Ok(Method::CONNECT),
        "TRACE" => Ok(Method::TRACE),
        _ => Err(UnsupportedMethod(method.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_case_insensitive() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method("Post").unwrap(), Method::POST);
        assert_eq!(parse_method("DELETE").unwrap(), Method::DELETE);
    }

    #[test]
    fn test_parse_method_rejects_unknown_verb() {
        let err = parse_method("FETCH").unwrap_err();
        assert_eq!(err, UnsupportedMethod("FETCH".to_string()));
    }

    #[test]
    fn test_builder_sets_headers_and_payload() {
        #[derive(Serialize)]
        struct Body {
            name: &'static str,
        }

        let spec = RequestSpec::post("https://example.com/items")
            .header("Accept", "application/json")
            .headers([("X-Trace", "1")])
            .json(&Body { name: "widget" })
            .unwrap();

        assert_eq!(spec.method(), &Method::POST);
        assert_eq!(spec.url(), "https://example.com/items");
        assert_eq!(spec.header_map().get("Accept").unwrap(), "application/json");
        assert_eq!(spec.header_map().get("X-Trace").unwrap(), "1");
        assert_eq!(spec.payload(), Some(&serde_json::json!({"name": "widget"})));
    }

    #[test]
    fn test_header_replaces_previous_value() {
        let spec = RequestSpec::get("https://example.com")
            .header("Accept", "text/html")
            .header("Accept", "application/json");
        assert_eq!(spec.header_map().len(), 1);
        assert_eq!(spec.header_map()["Accept"], "application/json");
    }

    #[test]
    fn test_get_has_no_payload() {
        let spec = RequestSpec::get("https://example.com");
        assert!(spec.payload().is_none());
        assert!(spec.header_map().is_empty());
    }
}
