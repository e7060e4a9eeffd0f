use crate::application::services::HttpRequestService;
use crate::infrastructure::config::AppContext;
use crate::infrastructure::recon::{
    self, DnsRecords, GeoLocation, PROBE_TIMEOUT, PROBED_PORTS, TlsStatus,
};
use crate::presentation::modules::Module;
use crate::presentation::printer::{self, HeadingLevel};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};

/// `hc explore <host>`
pub struct ExploreModule {
    requests: HttpRequestService,
}

/// One row of the server scan table
#[derive(Debug, Clone, PartialEq)]
pub struct ServerProfile {
    pub ip: Ipv4Addr,
    pub location: Option<GeoLocation>,
    pub open_ports: BTreeMap<u16, bool>,
    pub tls: TlsStatus,
}

impl ServerProfile {
    fn cells(&self) -> Vec<String> {
        let (country, region, city) = match &self.location {
            Some(location) => (
                location.country.clone(),
                location.region.clone(),
                location.city.clone(),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };

        let mut cells = vec![self.ip.to_string(), country, region, city];
        cells.extend(PROBED_PORTS.iter().map(|(port, _)| {
            match self.open_ports.get(port) {
                Some(true) => "open",
                Some(false) => "closed",
                None => "-",
            }
            .to_string()
        }));
        cells.push(self.tls.issuer());
        cells.push(self.tls.expiry());
        cells
    }
}

fn table_header() -> Vec<String> {
    let mut header: Vec<String> = ["IP Address", "Country", "Region", "City"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    header.extend(PROBED_PORTS.iter().map(|(_, label)| label.to_string()));
    header.push("SSL Issuer".to_string());
    header.push("SSL Expiry".to_string());
    header
}

fn dns_table(records: &DnsRecords) -> Vec<String> {
    let header = vec!["CNAME".to_string(), "NS Records".to_string()];
    format_table(&header, &[records.cells()])
}

/// Left-aligned columns separated by two spaces.
fn format_table(header: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    std::iter::once(header)
        .chain(rows.iter().map(Vec::as_slice))
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

impl ExploreModule {
    pub fn new(requests: HttpRequestService) -> Self {
        Self { requests }
    }

    async fn profile(&self, host: &str, ip: Ipv4Addr) -> ServerProfile {
        let addr = IpAddr::V4(ip);
        let ports: Vec<u16> = PROBED_PORTS.iter().map(|(port, _)| *port).collect();

        let location = match recon::geolocate(&self.requests, addr).await {
            Ok(location) => Some(location),
            Err(err) => {
                tracing::warn!(%ip, error = %err, "geolocation failed");
                None
            }
        };
        let open_ports = recon::scan_ports(addr, &ports, PROBE_TIMEOUT).await;
        let tls = recon::check_tls(addr, 443, host, PROBE_TIMEOUT).await;

        ServerProfile {
            ip,
            location,
            open_ports,
            tls,
        }
    }
}

#[async_trait]
impl Module for ExploreModule {
    fn name(&self) -> &'static str {
        "explore"
    }

    fn description(&self) -> &'static str {
        "Profiles a given hostname or IP address, fetching DNS, geolocation, port scan and TLS data."
    }

    fn logo(&self) -> &'static str {
        "🔍"
    }

    fn usage(&self) -> String {
        format!("{} <hostname>", self.name())
    }

    async fn execute(&self, _ctx: &AppContext, args: &[String]) -> Result<()> {
        printer::print(self.name(), HeadingLevel::ModuleTitle);

        let [host] = args else {
            printer::print(&format!("Usage: hc {}", self.usage()), HeadingLevel::NormalText);
            return Ok(());
        };

        printer::print("DNS Records", HeadingLevel::Header1);
        for line in dns_table(&recon::lookup_dns_records(host).await) {
            printer::print(&line, HeadingLevel::NormalText);
        }

        let ips = match recon::resolve_ipv4(host).await {
            Ok(ips) => ips,
            Err(err) => {
                tracing::warn!(host = %host, error = %err, "error resolving host");
                Vec::new()
            }
        };
        if ips.is_empty() {
            printer::print(&format!("No IPv4 addresses found for {host}."), HeadingLevel::NormalText);
            return Ok(());
        }
        for ip in &ips {
            printer::print(&format!("A  {ip}"), HeadingLevel::NormalText);
        }

        printer::print("Server Scans", HeadingLevel::Header1);
        let mut rows = Vec::with_capacity(ips.len());
        for ip in ips {
            rows.push(self.profile(host, ip).await.cells());
        }
        for line in format_table(&table_header(), &rows) {
            printer::print(&line, HeadingLevel::NormalText);
        }
        Ok(())
    }
}
