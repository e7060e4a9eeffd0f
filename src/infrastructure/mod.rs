pub mod config;
pub mod files;
pub mod http_client;
pub mod logging;
pub mod output;
pub mod recon;
