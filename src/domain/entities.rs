use crate::domain::api_config::{Environment, Route, Service};
use crate::domain::errors::ApiError;
use crate::domain::value_objects::{RequestBody, Url};
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderMap};
use std::fmt;
use std::str::FromStr;

/// HTTP method, passed through verbatim from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Method(pub hyper::Method);

impl FromStr for Method {
    type Err = ApiError;

    /// Any syntactically valid token is accepted, including extension verbs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hyper::Method::from_bytes(s.as_bytes())
            .map(Method)
            .map_err(|_| ApiError::RequestConstruction(format!("invalid HTTP method '{s}'")))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// The (service, route, environment) triple picked for one request.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedEndpoint<'a> {
    pub service: &'a Service,
    pub route: &'a Route,
    pub environment: &'a Environment,
    /// Set when the triple came from interactive selection.
    pub interactive: bool,
}

impl ResolvedEndpoint<'_> {
    /// Arguments that reproduce this selection without prompting.
    pub fn replay_args(&self) -> String {
        format!(
            "{} {} {}",
            self.service.name, self.route.name, self.environment.name
        )
    }
}

/// Represents an HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>, // Key-value pairs for headers
    pub body: Option<RequestBody>,
}

impl Request {
    pub fn content_type(&self) -> &str {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
            .map(|(_, value)| value.as_str())
            .unwrap_or_default()
    }

    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_ref().map(RequestBody::as_bytes).unwrap_or_default()
    }
}

/// Represents an HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    /// Every received header; a name may carry several values.
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn method_is_passed_through_verbatim() {
        assert_eq!("GET".parse::<Method>().unwrap().0, hyper::Method::GET);
        assert_eq!("PURGE".parse::<Method>().unwrap().to_string(), "PURGE");
        assert_eq!("get".parse::<Method>().unwrap().to_string(), "get");
    }

    #[test]
    fn malformed_method_is_a_construction_failure() {
        assert!(matches!(
            "GE T".parse::<Method>(),
            Err(ApiError::RequestConstruction(_))
        ));
        assert!(matches!("".parse::<Method>(), Err(ApiError::RequestConstruction(_))));
    }

    #[test]
    fn request_content_type_lookup_ignores_case() {
        let request = Request {
            method: "POST".parse().unwrap(),
            url: Url::new("https://httpbin.org/post").unwrap(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: RequestBody::new("{}"),
        };
        assert_eq!(request.content_type(), "application/json");
        assert_eq!(request.body_bytes(), b"{}");
    }

    #[test]
    fn response_without_content_type_is_empty() {
        let mut response = Response {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        };
        assert_eq!(response.content_type(), "");

        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/xml"));
        assert_eq!(response.content_type(), "text/xml");
    }
}
