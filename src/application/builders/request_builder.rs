use crate::domain::entities::{Method, Request, ResolvedEndpoint};
use crate::domain::errors::ApiError;
use crate::domain::value_objects::{RequestBody, Url};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    url: Option<Url>,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled from a resolved endpoint: route method, environment
    /// base URL joined with the route path, environment headers, route body.
    pub fn for_endpoint(endpoint: &ResolvedEndpoint<'_>) -> Result<Self, ApiError> {
        Ok(Self::new()
            .method(&endpoint.route.method)?
            .url(&endpoint.environment.base_url, &endpoint.route.path)?
            .headers(&endpoint.environment.headers)
            .body(&endpoint.route.body))
    }

    pub fn method(mut self, method: &str) -> Result<Self, ApiError> {
        self.method = Some(Method::from_str(method)?);
        Ok(self)
    }

    pub fn url(mut self, base_url: &str, path: &str) -> Result<Self, ApiError> {
        self.url = Some(Url::join(base_url, path)?);
        Ok(self)
    }

    pub fn headers(mut self, headers: &BTreeMap<String, String>) -> Self {
        self.headers.extend(
            headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        self
    }

    pub fn body(mut self, raw: &str) -> Self {
        self.body = RequestBody::new(raw);
        self
    }

    pub fn build(self) -> Result<Request, ApiError> {
        let method = self
            .method
            .ok_or_else(|| ApiError::RequestConstruction("method is required".to_string()))?;
        let url = self
            .url
            .ok_or_else(|| ApiError::RequestConstruction("URL is required".to_string()))?;

        Ok(Request {
            method,
            url,
            headers: self.headers,
            body: self.body,
        })
    }
}
