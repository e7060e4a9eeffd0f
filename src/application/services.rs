use crate::domain::entities::{Request, Response};
use crate::domain::errors::ApiError;
use async_trait::async_trait;
use hyper::header::{HeaderName, HeaderValue};

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// One attempt, no retry.
    async fn send(&self, request: Request) -> Result<Response, ApiError>;
}

/// Application service for sending requests built from configuration
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Validates and sends a single request
    pub async fn send_request(&self, request: Request) -> Result<Response, ApiError> {
        RequestValidator::validate(&request)?;
        tracing::info!(method = %request.method, url = %request.url.as_str(), "sending request");

        let response = self.http_client.send(request).await;
        match &response {
            Ok(response) => tracing::info!(status = %response.status, "received response"),
            Err(err) => tracing::warn!(error = %err, "request failed"),
        }
        response
    }
}

/// Rejects requests that could not be put on the wire
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &Request) -> Result<(), ApiError> {
        for (name, value) in &request.headers {
            Self::header(name, value)?;
        }
        Ok(())
    }

    /// Parses one configured header into its wire form.
    pub fn header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ApiError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::RequestConstruction(format!("invalid header name '{name}'")))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            ApiError::RequestConstruction(format!("invalid value for header '{name}'"))
        })?;
        Ok((header_name, header_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{RequestBody, Url};
    use hyper::StatusCode;
    use hyper::body::Bytes;
    use hyper::header::HeaderMap;

    fn request(headers: Vec<(&str, &str)>) -> Request {
        Request {
            method: "POST".parse().unwrap(),
            url: Url::new("https://httpbin.org/post").unwrap(),
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: RequestBody::new("{}"),
        }
    }

    #[tokio::test]
    async fn forwards_valid_requests_to_the_client() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .withf(|req| req.url.as_str() == "https://httpbin.org/post" && req.body_bytes() == b"{}")
            .times(1)
            .returning(|_| {
                Ok(Response {
                    status: StatusCode::OK,
                    headers: HeaderMap::new(),
                    body: Bytes::from_static(b"ok"),
                })
            });

        let service = HttpRequestService::new(Box::new(client));
        let response = service
            .send_request(request(vec![("Content-Type", "application/json")]))
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, Bytes::from_static(b"ok"));
    }

    #[tokio::test]
    async fn invalid_headers_never_reach_the_client() {
        let mut client = MockHttpClient::new();
        client.expect_send().never();
        let service = HttpRequestService::new(Box::new(client));

        let bad_name = service.send_request(request(vec![("Bad Header", "x")])).await;
        assert!(matches!(bad_name, Err(ApiError::RequestConstruction(_))));

        let bad_value = service.send_request(request(vec![("X-Token", "line\nbreak")])).await;
        assert!(matches!(bad_value, Err(ApiError::RequestConstruction(_))));
    }

    #[test]
    fn header_parsing_keeps_value_bytes() {
        let (name, value) = RequestValidator::header("X-Trace", "a b;c").unwrap();
        assert_eq!(name, "x-trace");
        assert_eq!(value, "a b;c");

        let err = RequestValidator::header("X Trace", "v").unwrap_err();
        assert_eq!(err.to_string(), "Error creating request: invalid header name 'X Trace'");
    }

    #[tokio::test]
    async fn transport_failures_are_returned_unchanged() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .returning(|_| Err(ApiError::Transport("connection refused".to_string())));

        let service = HttpRequestService::new(Box::new(client));
        let err = service.send_request(request(vec![])).await.unwrap_err();
        assert!(err.is_transport());
    }
}
