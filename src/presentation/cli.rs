use crate::infrastructure::config::{AppContext, CONFIG_DIR_ENV_VAR};
use crate::infrastructure::http_client::HyperHttpClient;
use crate::presentation::modules::api::ApiModule;
use crate::presentation::modules::config::ConfigModule;
use crate::presentation::modules::explore::ExploreModule;
use crate::presentation::modules::log::LogModule;
use crate::presentation::modules::{Module, run_module};
use crate::presentation::printer;
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

/// CLI configuration for hc
#[derive(Parser, Debug)]
#[command(name = "hc", version)]
#[command(
    about = "hc: call named API endpoints and profile hosts from the command line",
    long_about = None
)]
pub struct Cli {
    /// Directory holding api_config.yml and hc.log. Defaults to $HOME/.hc
    #[arg(long, global = true, env = CONFIG_DIR_ENV_VAR)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Send a request to a configured API endpoint and show the response.
    ///
    /// With all three names the endpoint is used directly, e.g.
    /// `hc api HttpBin get-ip default`. If any name is missing, a guided
    /// prompt selects service, route and environment.
    Api {
        service: Option<String>,
        route: Option<String>,
        environment: Option<String>,
    },
    /// Profile a host: addresses, geolocation, open ports and TLS
    Explore { host: String },
    /// Show the log file location and its last lines
    Log,
    /// Show the API config file location and its contents
    Config,
}

impl Command {
    /// Positional arguments handed to the module.
    fn args(&self) -> Vec<String> {
        match self {
            Command::Api {
                service,
                route,
                environment,
            } => [service, route, environment]
                .into_iter()
                .map(|name| name.clone().unwrap_or_default())
                .collect(),
            Command::Explore { host } => vec![host.clone()],
            Command::Log | Command::Config => Vec::new(),
        }
    }
}

fn all_modules() -> Vec<Box<dyn Module>> {
    vec![
        Box::new(ApiModule::new(HyperHttpClient::new().create_request_service())),
        Box::new(ExploreModule::new(HyperHttpClient::new().create_request_service())),
        Box::new(LogModule),
        Box::new(ConfigModule),
    ]
}

fn module_for(command: &Command) -> Box<dyn Module> {
    match command {
        Command::Api { .. } => Box::new(ApiModule::new(HyperHttpClient::new().create_request_service())),
        Command::Explore { .. } => {
            Box::new(ExploreModule::new(HyperHttpClient::new().create_request_service()))
        }
        Command::Log => Box::new(LogModule),
        Command::Config => Box::new(ConfigModule),
    }
}

impl Cli {
    pub async fn run(&self, ctx: &AppContext) -> Result<()> {
        let Some(command) = &self.command else {
            print_overview();
            return Ok(());
        };

        let module = module_for(command);
        run_module(module.as_ref(), ctx, &command.args()).await
    }
}

fn print_overview() {
    println!("{}", printer::title().bright_blue());
    println!("{}\n", "Modules:".bold());
    for module in all_modules() {
        println!("  {} {}", module.logo(), format!("hc {}", module.usage()).cyan());
        println!("     {}", module.description());
    }
    println!("\nRun `hc --help` for details.");
}
