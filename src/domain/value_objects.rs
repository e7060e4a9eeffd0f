use crate::domain::errors::ApiError;
use hyper::Uri;

/// Represents a validated absolute URL
///
/// The text it was built from is kept so that it prints exactly as joined.
#[derive(Debug, Clone)]
pub struct Url {
    uri: Uri,
    raw: String,
}

impl Url {
    /// Creates a new Url with validation
    ///
    /// # Arguments
    /// * `url` - The URL string to parse
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL with an `http` or `https` scheme and a host
    /// * `Err(ApiError::RequestConstruction)` - If the URL is invalid
    pub fn new(url: &str) -> Result<Self, ApiError> {
        let uri = url
            .parse::<Uri>()
            .map_err(|e| ApiError::RequestConstruction(format!("invalid URL '{url}': {e}")))?;

        match uri.scheme_str() {
            Some("http") | Some("https") => {}
            _ => {
                return Err(ApiError::RequestConstruction(format!(
                    "URL '{url}' must start with http:// or https://"
                )));
            }
        }
        if uri.host().is_none_or(str::is_empty) {
            return Err(ApiError::RequestConstruction(format!(
                "URL '{url}' has no host"
            )));
        }

        Ok(Url {
            uri,
            raw: url.to_string(),
        })
    }

    /// Joins an environment base URL and a route path by plain concatenation.
    pub fn join(base_url: &str, path: &str) -> Result<Self, ApiError> {
        Self::new(&format!("{base_url}{path}"))
    }

    /// Returns the URL as it was written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_https(&self) -> bool {
        self.uri.scheme_str() == Some("https")
    }

    /// Host as it appears in the URL; IPv6 literals keep their brackets.
    pub fn host(&self) -> &str {
        self.uri.host().unwrap_or_default()
    }

    /// Host to dial and to present for TLS, without IPv6 brackets.
    pub fn connect_host(&self) -> &str {
        let host = self.host();
        host.strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(host)
    }

    pub fn port(&self) -> u16 {
        self.uri
            .port_u16()
            .unwrap_or(if self.is_https() { 443 } else { 80 })
    }

    /// Host header value; the port is kept only when it was explicit.
    pub fn authority(&self) -> String {
        self.uri
            .authority()
            .map(|authority| authority.to_string())
            .unwrap_or_default()
    }

    /// Origin-form target sent on the request line.
    pub fn path_and_query(&self) -> &str {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
    }
}

/// Request payload, sent verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody(pub String);

impl RequestBody {
    /// An empty string means the request carries no body.
    pub fn new(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(RequestBody(raw.to_string()))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_plain_concatenation() {
        let url = Url::join("https://httpbin.org", "/post").unwrap();
        assert_eq!(url.as_str(), "https://httpbin.org/post");
    }

    #[test]
    fn join_inserts_no_separator() {
        let url = Url::join("https://example.com/api", "v1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/apiv1");
    }

    #[test]
    fn join_keeps_double_slashes() {
        let url = Url::join("https://example.com/", "/ip").unwrap();
        assert_eq!(url.path_and_query(), "//ip");
    }

    #[test]
    fn empty_path_prints_without_trailing_slash() {
        let url = Url::join("https://a.com", "").unwrap();
        assert_eq!(url.as_str(), "https://a.com");
        assert_eq!(url.path_and_query(), "/");
    }

    #[test]
    fn ipv6_literal_is_dialed_without_brackets() {
        let url = Url::new("http://[::1]:8080/x").unwrap();
        assert_eq!(url.host(), "[::1]");
        assert_eq!(url.connect_host(), "::1");
        assert_eq!(url.authority(), "[::1]:8080");

        let named = Url::new("https://example.com/").unwrap();
        assert_eq!(named.connect_host(), "example.com");
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(matches!(
            Url::new("ftp://example.com/file"),
            Err(ApiError::RequestConstruction(_))
        ));
        assert!(matches!(
            Url::new("not a url"),
            Err(ApiError::RequestConstruction(_))
        ));
    }

    #[test]
    fn default_ports_follow_scheme() {
        assert_eq!(Url::new("https://example.com/").unwrap().port(), 443);
        assert_eq!(Url::new("http://example.com/").unwrap().port(), 80);
        let local = Url::new("http://127.0.0.1:8080/ip?x=1").unwrap();
        assert_eq!(local.port(), 8080);
        assert_eq!(local.authority(), "127.0.0.1:8080");
        assert_eq!(local.path_and_query(), "/ip?x=1");
    }

    #[test]
    fn empty_body_means_no_body() {
        assert_eq!(RequestBody::new(""), None);
        assert_eq!(
            RequestBody::new("{\"a\":1}"),
            Some(RequestBody("{\"a\":1}".to_string()))
        );
    }
}
