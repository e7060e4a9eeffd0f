use crate::application::selector::{InteractiveSelector, Prompt};
use crate::domain::api_config::ApiConfig;
use crate::domain::entities::ResolvedEndpoint;
use crate::domain::errors::ApiError;

/// Turns up to three name fragments into a concrete endpoint.
pub struct EndpointResolver<'c> {
    config: &'c ApiConfig,
}

impl<'c> EndpointResolver<'c> {
    pub fn new(config: &'c ApiConfig) -> Self {
        Self { config }
    }

    /// Empty strings mean "not supplied".
    ///
    /// With all three names present the lookup is exact and never prompts.
    /// If any name is missing the supplied ones are ignored and the whole
    /// triple is chosen through `prompt`.
    pub fn resolve(
        &self,
        service: &str,
        route: &str,
        environment: &str,
        prompt: &mut dyn Prompt,
    ) -> Result<ResolvedEndpoint<'c>, ApiError> {
        if service.is_empty() || route.is_empty() || environment.is_empty() {
            tracing::debug!("incomplete endpoint name, switching to interactive selection");
            let (service, route, environment) = InteractiveSelector::new(prompt)
                .select(self.config)
                .ok_or(ApiError::InvalidSelection)?;
            return Ok(ResolvedEndpoint {
                service,
                route,
                environment,
                interactive: true,
            });
        }

        self.lookup(service, route, environment)
            .ok_or(ApiError::InvalidSelection)
    }

    fn lookup(
        &self,
        service: &str,
        route: &str,
        environment: &str,
    ) -> Option<ResolvedEndpoint<'c>> {
        let service = self.config.service(service)?;
        let route = service.route(route)?;
        let environment = service.environment(environment)?;
        Some(ResolvedEndpoint {
            service,
            route,
            environment,
            interactive: false,
        })
    }
}
