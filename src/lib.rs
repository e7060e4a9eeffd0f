//! hc: call named API endpoints and profile hosts from the command line.
//!
//! Endpoints are described in a YAML document as services, each with routes
//! and environments. `hc api` resolves a (service, route, environment) triple,
//! builds the request, sends it and renders the response.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
