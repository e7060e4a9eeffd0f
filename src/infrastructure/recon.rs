//! Host profiling checks used by `hc explore`.
//!
//! Each check is a single network call; failures degrade to an "unknown"
//! result instead of aborting the profile.

use crate::application::builders::request_builder::RequestBuilder;
use crate::application::services::HttpRequestService;
use crate::domain::errors::ApiError;
use futures::future::join_all;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::proto::rr::{RData, RecordType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::net::{TcpStream, lookup_host};
use tokio_native_tls::{TlsConnector, native_tls};

/// Ports probed for every address, with the label shown in the report.
pub const PROBED_PORTS: [(u16, &str); 4] = [(80, "HTTP"), (443, "HTTPS"), (22, "SSH"), (115, "SFTP")];

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

const GEOLOCATION_BASE_URL: &str = "https://ipinfo.io";

/// IPv4 addresses the system resolver returns for `host`, deduplicated and
/// sorted.
pub async fn resolve_ipv4(host: &str) -> std::io::Result<Vec<Ipv4Addr>> {
    let mut addrs: Vec<Ipv4Addr> = lookup_host((host, 0))
        .await?
        .filter_map(|addr| match addr.ip() {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
        .collect();
    addrs.sort();
    addrs.dedup();
    Ok(addrs)
}

/// CNAME and NS records published for a host name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnsRecords {
    pub cnames: Vec<String>,
    pub name_servers: Vec<String>,
}

impl DnsRecords {
    /// One cell per record type, values comma separated, `-` when absent.
    pub fn cells(&self) -> Vec<String> {
        [&self.cnames, &self.name_servers]
            .iter()
            .map(|records| {
                if records.is_empty() {
                    "-".to_string()
                } else {
                    records.join(", ")
                }
            })
            .collect()
    }
}

/// Queries the system-configured name servers; a failed lookup leaves its
/// list empty.
pub async fn lookup_dns_records(host: &str) -> DnsRecords {
    let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(err) => {
            tracing::warn!(error = %err, "no usable resolver configuration");
            return DnsRecords::default();
        }
    };

    let cnames = match resolver.lookup(host, RecordType::CNAME).await {
        Ok(lookup) => lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::CNAME(cname) => Some(cname.0.to_utf8()),
                _ => None,
            })
            .collect(),
        Err(err) => {
            tracing::debug!(host, error = %err, "no CNAME records");
            Vec::new()
        }
    };
    let name_servers = match resolver.ns_lookup(host).await {
        Ok(lookup) => lookup.iter().map(|ns| ns.0.to_utf8()).collect(),
        Err(err) => {
            tracing::debug!(host, error = %err, "no NS records");
            Vec::new()
        }
    };

    DnsRecords {
        cnames,
        name_servers,
    }
}

/// True when a TCP connection to `ip:port` is accepted within `timeout`.
pub async fn probe_port(ip: IpAddr, port: u16, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect((ip, port))).await,
        Ok(Ok(_))
    )
}

/// Probes all `ports` of one address concurrently.
pub async fn scan_ports(ip: IpAddr, ports: &[u16], timeout: Duration) -> BTreeMap<u16, bool> {
    let probes = ports.iter().map(|&port| async move { (port, probe_port(ip, port, timeout).await) });
    join_all(probes).await.into_iter().collect()
}

/// Leaf certificate presented by a TLS server
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateInfo {
    /// Common name of the issuer; empty when the issuer has none.
    pub issuer: String,
    /// `notAfter`, UTC, `YYYY-MM-DD HH:MM:SS`.
    pub expires: String,
}

impl CertificateInfo {
    pub fn from_der(der: &[u8]) -> Result<Self, String> {
        let (_, certificate) =
            x509_parser::parse_x509_certificate(der).map_err(|e| e.to_string())?;

        let issuer = certificate
            .issuer()
            .iter_common_name()
            .next()
            .and_then(|cn| cn.as_str().ok())
            .unwrap_or_default()
            .to_string();
        let not_after = certificate.validity().not_after.timestamp();
        let expires = chrono::DateTime::from_timestamp(not_after, 0)
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .ok_or_else(|| format!("expiry {not_after} out of range"))?;

        Ok(Self { issuer, expires })
    }
}

/// Outcome of a TLS handshake against port 443
#[derive(Debug, Clone, PartialEq)]
pub enum TlsStatus {
    /// Handshake completed; the certificate was verified unless the target
    /// was addressed by IP.
    Presented(CertificateInfo),
    Invalid(String),
    Unreachable,
}

impl TlsStatus {
    pub fn issuer(&self) -> String {
        match self {
            TlsStatus::Presented(certificate) => certificate.issuer.clone(),
            TlsStatus::Invalid(reason) => format!("invalid ({reason})"),
            TlsStatus::Unreachable => "-".to_string(),
        }
    }

    pub fn expiry(&self) -> String {
        match self {
            TlsStatus::Presented(certificate) => certificate.expires.clone(),
            TlsStatus::Invalid(_) | TlsStatus::Unreachable => "-".to_string(),
        }
    }
}

/// Connects to `ip:port`, completes a handshake for `server_name` and reads
/// the peer certificate.
///
/// Certificates are only verified when `server_name` is a host name; an IP
/// literal has no name to check them against.
pub async fn check_tls(ip: IpAddr, port: u16, server_name: &str, timeout: Duration) -> TlsStatus {
    let skip_verification = server_name.parse::<IpAddr>().is_ok();

    let handshake = async {
        let tcp = match TcpStream::connect((ip, port)).await {
            Ok(tcp) => tcp,
            Err(_) => return TlsStatus::Unreachable,
        };
        let connector = match native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(skip_verification)
            .danger_accept_invalid_hostnames(skip_verification)
            .build()
        {
            Ok(connector) => TlsConnector::from(connector),
            Err(err) => return TlsStatus::Invalid(err.to_string()),
        };
        let tls = match connector.connect(server_name, tcp).await {
            Ok(tls) => tls,
            Err(err) => return TlsStatus::Invalid(err.to_string()),
        };

        let der = match tls.get_ref().peer_certificate() {
            Ok(Some(certificate)) => certificate.to_der(),
            Ok(None) => return TlsStatus::Invalid("no peer certificate".to_string()),
            Err(err) => return TlsStatus::Invalid(err.to_string()),
        };
        match der.map_err(|e| e.to_string()).and_then(|der| CertificateInfo::from_der(&der)) {
            Ok(certificate) => TlsStatus::Presented(certificate),
            Err(reason) => TlsStatus::Invalid(reason),
        }
    };

    tokio::time::timeout(timeout, handshake)
        .await
        .unwrap_or(TlsStatus::Unreachable)
}

/// Location fields reported by ipinfo.io; missing fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeoLocation {
    pub country: String,
    pub region: String,
    pub city: String,
}

/// Looks up the location of `ip` through the regular request path.
pub async fn geolocate(requests: &HttpRequestService, ip: IpAddr) -> Result<GeoLocation, ApiError> {
    let request = RequestBuilder::new()
        .method("GET")?
        .url(GEOLOCATION_BASE_URL, &format!("/{ip}/json"))?
        .build()?;

    let response = requests.send_request(request).await?;
    serde_json::from_slice(&response.body)
        .map_err(|e| ApiError::ResponseRead(format!("unexpected geolocation payload: {e}")))
}
