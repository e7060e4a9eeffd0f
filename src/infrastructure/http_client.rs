use crate::application::services::{HttpClient, HttpRequestService, RequestValidator};
use crate::domain::entities::{Method, Request, Response};
use crate::domain::errors::ApiError;
use crate::domain::value_objects::{RequestBody, Url};

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::client::conn::http1;
use hyper::header::{AUTHORIZATION, COOKIE, HOST, HeaderMap, HeaderName, HeaderValue, LOCATION};
use hyper::{Request as HyperRequest, StatusCode};
use hyper_util::rt::TokioIo;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_native_tls::{TlsConnector, native_tls};

/// Wall-clock budget for connect, request and full response read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redirects followed for one request before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Infrastructure implementation of HttpClient using Hyper
///
/// Every request opens its own connection (TLS via native-tls for `https`)
/// and runs under a single timeout, redirects included.
pub struct HyperHttpClient {
    timeout: Duration,
}

impl HyperHttpClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Creates a configured HTTP request service using this client
    pub fn create_request_service(self) -> HttpRequestService {
        HttpRequestService::new(Box::new(self))
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: Request) -> Result<Response, ApiError> {
        tokio::time::timeout(self.timeout, self.follow_redirects(request))
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))?
    }
}

impl HyperHttpClient {
    async fn follow_redirects(&self, mut request: Request) -> Result<Response, ApiError> {
        let mut redirects = 0;
        loop {
            let hyper_request = RequestAdapter::to_hyper_request(&request)?;
            let hyper_response = self.execute_http_request(&request.url, hyper_request).await?;

            let status = hyper_response.status();
            let Some(next) = RedirectAdapter::next_request(&request, status, hyper_response.headers())?
            else {
                return ResponseAdapter::to_domain_response(hyper_response).await;
            };
            if redirects == MAX_REDIRECTS {
                return Err(ApiError::Transport(format!(
                    "stopped after {MAX_REDIRECTS} redirects"
                )));
            }
            redirects += 1;
            tracing::debug!(%status, location = %next.url.as_str(), "following redirect");
            request = next;
        }
    }

    async fn execute_http_request(
        &self,
        url: &Url,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>, ApiError> {
        let tcp = TcpStream::connect((url.connect_host(), url.port()))
            .await
            .map_err(|e| ApiError::Transport(format!("connect to {}: {}", url.authority(), e)))?;

        if url.is_https() {
            let connector = native_tls::TlsConnector::new()
                .map(TlsConnector::from)
                .map_err(|e| ApiError::Transport(format!("TLS setup failed: {}", e)))?;
            let tls = connector
                .connect(url.connect_host(), tcp)
                .await
                .map_err(|e| ApiError::Transport(format!("TLS handshake failed: {}", e)))?;
            Self::exchange(tls, request).await
        } else {
            Self::exchange(tcp, request).await
        }
    }

    async fn exchange<S>(
        stream: S,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>, ApiError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sender, connection) = http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| ApiError::Transport(format!("HTTP handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::debug!(error = %err, "connection closed with error");
            }
        });

        sender
            .send_request(request)
            .await
            .map_err(|e| ApiError::Transport(format!("HTTP request execution failed: {}", e)))
    }
}

/// Adapter for turning a redirect response into the next request
struct RedirectAdapter;

impl RedirectAdapter {
    /// Credentials are not carried to another host.
    const SENSITIVE_HEADERS: [HeaderName; 2] = [AUTHORIZATION, COOKIE];

    /// Returns the request for the `Location` target, or `None` when the
    /// response is final.
    ///
    /// 301, 302 and 303 drop the body; POST (any method but HEAD for 303)
    /// becomes GET. 307 and 308 repeat the request as is.
    fn next_request(
        request: &Request,
        status: StatusCode,
        headers: &HeaderMap,
    ) -> Result<Option<Request>, ApiError> {
        let keeps_body = match status.as_u16() {
            301 | 302 | 303 => false,
            307 | 308 => true,
            _ => return Ok(None),
        };
        let Some(location) = headers.get(LOCATION) else {
            return Ok(None);
        };
        let location = location
            .to_str()
            .map_err(|_| ApiError::Transport("redirect location is not valid text".to_string()))?;
        let url = Self::resolve_location(&request.url, location)?;

        let method = &request.method.0;
        let becomes_get = match status.as_u16() {
            301 | 302 => *method == hyper::Method::POST,
            303 => *method != hyper::Method::HEAD,
            _ => false,
        };
        let method = if becomes_get {
            Method(hyper::Method::GET)
        } else {
            request.method.clone()
        };

        let mut headers = request.headers.clone();
        if url.host() != request.url.host() {
            headers.retain(|(name, _)| {
                !Self::SENSITIVE_HEADERS
                    .iter()
                    .any(|sensitive| name.eq_ignore_ascii_case(sensitive.as_str()))
            });
        }

        Ok(Some(Request {
            method,
            url,
            headers,
            body: if keeps_body { request.body.clone() } else { None },
        }))
    }

    /// Relative locations are resolved against the URL that answered.
    fn resolve_location(current: &Url, location: &str) -> Result<Url, ApiError> {
        let target = url::Url::parse(current.as_str())
            .and_then(|base| base.join(location))
            .map_err(|e| ApiError::Transport(format!("invalid redirect location '{location}': {e}")))?;
        Url::new(target.as_str()).map_err(|_| {
            ApiError::Transport(format!("unsupported redirect location '{location}'"))
        })
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(domain_request: &Request) -> Result<HyperRequest<Full<Bytes>>, ApiError> {
        let mut builder = HyperRequest::builder()
            .method(domain_request.method.0.clone())
            .uri(domain_request.url.path_and_query());

        builder = HeaderAdapter::add_configured_headers(builder, &domain_request.headers)?;
        builder = HeaderAdapter::add_host(builder, &domain_request.url)?;

        builder
            .body(BodyAdapter::to_hyper_body(&domain_request.body))
            .map_err(|e| ApiError::RequestConstruction(format!("failed to build HTTP request: {}", e)))
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(hyper_response: hyper::Response<Incoming>) -> Result<Response, ApiError> {
        let (parts, body) = hyper_response.into_parts();
        let body = Self::extract_response_body(body).await?;

        Ok(Response {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    /// Partial data is dropped when the stream breaks.
    async fn extract_response_body(body: Incoming) -> Result<Bytes, ApiError> {
        body.collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|e| ApiError::ResponseRead(e.to_string()))
    }
}

/// Adapter for converting domain request bodies to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(domain_body: &Option<RequestBody>) -> Full<Bytes> {
        match domain_body {
            Some(body) => Full::new(Bytes::from(body.0.clone())),
            None => Full::new(Bytes::new()),
        }
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    /// Configured headers are set verbatim; a repeated name replaces the
    /// earlier value.
    fn add_configured_headers(
        mut builder: http::request::Builder,
        headers: &[(String, String)],
    ) -> Result<http::request::Builder, ApiError> {
        let Some(map) = builder.headers_mut() else {
            return Ok(builder);
        };
        for (name, value) in headers {
            let (name, value) = RequestValidator::header(name, value)?;
            map.insert(name, value);
        }
        Ok(builder)
    }

    fn add_host(
        mut builder: http::request::Builder,
        url: &Url,
    ) -> Result<http::request::Builder, ApiError> {
        let Some(map) = builder.headers_mut() else {
            return Ok(builder);
        };
        if !map.contains_key(HOST) {
            let host = HeaderValue::from_str(&url.authority())
                .map_err(|_| ApiError::RequestConstruction(format!("invalid host '{}'", url.host())))?;
            map.insert(HOST, host);
        }
        Ok(builder)
    }
}
