use crate::application::builders::request_builder::RequestBuilder;
use crate::application::resolver::EndpointResolver;
use crate::application::services::HttpRequestService;
use crate::domain::entities::{Request, ResolvedEndpoint, Response};
use crate::domain::errors::ApiError;
use crate::infrastructure::config::AppContext;
use crate::infrastructure::output::render_body;
use crate::presentation::modules::Module;
use crate::presentation::printer::{self, HeadingLevel, Lines};
use crate::presentation::prompt::TerminalPrompt;
use anyhow::Result;
use async_trait::async_trait;

/// `hc api [service] [route] [environment]`
pub struct ApiModule {
    requests: HttpRequestService,
}

impl ApiModule {
    pub fn new(requests: HttpRequestService) -> Self {
        Self { requests }
    }

    /// Builds, displays, sends and displays one request for `endpoint`.
    pub async fn perform(&self, endpoint: &ResolvedEndpoint<'_>) -> Result<Response, ApiError> {
        let request = RequestBuilder::for_endpoint(endpoint)?.build()?;
        print_request(&request);

        let response = self.requests.send_request(request).await?;
        print_response(&response);
        Ok(response)
    }
}

fn print_request(request: &Request) {
    printer::print_lines(&request_lines(request));
}

fn print_response(response: &Response) {
    printer::print_lines(&response_lines(response));
}

/// The request body is rendered by the request's own `Content-Type`.
fn request_lines(request: &Request) -> Lines {
    let mut lines = vec![
        (HeadingLevel::Header1, "HTTP Request".to_string()),
        (HeadingLevel::Header2, "URL".to_string()),
        (
            HeadingLevel::NormalText,
            format!("{} {}", request.method, request.url.as_str()),
        ),
        (HeadingLevel::Header2, "Headers".to_string()),
    ];
    lines.extend(
        printer::header_pair_lines(&request.headers)
            .into_iter()
            .map(|line| (HeadingLevel::NormalText, line)),
    );
    lines.push((HeadingLevel::Header2, "Body".to_string()));
    lines.push((
        HeadingLevel::NormalText,
        render_body(request.body_bytes(), request.content_type()),
    ));
    lines
}

fn response_lines(response: &Response) -> Lines {
    let mut lines = vec![
        (HeadingLevel::Header1, "HTTP Response".to_string()),
        (HeadingLevel::Header2, "Status".to_string()),
        (HeadingLevel::NormalText, response.status.to_string()),
        (HeadingLevel::Header2, "Headers".to_string()),
    ];
    lines.extend(
        printer::header_map_lines(&response.headers)
            .into_iter()
            .map(|line| (HeadingLevel::NormalText, line)),
    );
    lines.push((HeadingLevel::Header2, "Body".to_string()));
    lines.push((
        HeadingLevel::NormalText,
        render_body(&response.body, response.content_type()),
    ));
    lines
}

fn name_arg(args: &[String], index: usize) -> &str {
    args.get(index).map(String::as_str).unwrap_or_default()
}

#[async_trait]
impl Module for ApiModule {
    fn name(&self) -> &'static str {
        "api"
    }

    fn description(&self) -> &'static str {
        "Performs HTTP requests to services defined in the config file. Enters interactive mode if no arguments are specified."
    }

    fn logo(&self) -> &'static str {
        "📤"
    }

    fn usage(&self) -> String {
        format!("{} [<serviceName> <routeName> <environmentName>]", self.name())
    }

    async fn execute(&self, ctx: &AppContext, args: &[String]) -> Result<()> {
        printer::print(self.name(), HeadingLevel::ModuleTitle);

        if ctx.api_config.is_empty() {
            printer::print(
                "No services configured. Please check your configuration file.",
                HeadingLevel::NormalText,
            );
            return Ok(());
        }

        let resolved = EndpointResolver::new(&ctx.api_config).resolve(
            name_arg(args, 0),
            name_arg(args, 1),
            name_arg(args, 2),
            &mut TerminalPrompt::new(),
        );
        let endpoint = match resolved {
            Ok(endpoint) => endpoint,
            Err(err) => {
                tracing::info!(args = %args.join(" "), "no endpoint selected");
                printer::print(&err.to_string(), HeadingLevel::NormalText);
                return Ok(());
            }
        };

        if let Err(err) = self.perform(&endpoint).await {
            tracing::warn!(error = %err, endpoint = %endpoint.replay_args(), "API call failed");
            printer::print(&err.to_string(), HeadingLevel::NormalText);
        }

        if endpoint.interactive {
            printer::print(
                &format!(
                    "Use \"hc {} {}\" to re-try this API call.",
                    self.name(),
                    endpoint.replay_args()
                ),
                HeadingLevel::Hint,
            );
        }
        Ok(())
    }
}
