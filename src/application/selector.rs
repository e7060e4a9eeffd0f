use crate::domain::api_config::{ApiConfig, Environment, Route, Service};
use anyhow::Result;

/// A single-choice menu. `Ok(None)` means the user cancelled.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    fn choose(&mut self, label: &str, items: &[String]) -> Result<Option<usize>>;
}

/// Walks the user through service, then route, then environment.
///
/// Each step only offers entries of the service picked in the first step.
/// Cancelling any step, or a step with nothing to offer, aborts the whole
/// selection.
pub struct InteractiveSelector<'p> {
    prompt: &'p mut dyn Prompt,
}

impl<'p> InteractiveSelector<'p> {
    pub fn new(prompt: &'p mut dyn Prompt) -> Self {
        Self { prompt }
    }

    pub fn select<'c>(
        &mut self,
        config: &'c ApiConfig,
    ) -> Option<(&'c Service, &'c Route, &'c Environment)> {
        let service = self.pick("Select a Service", &config.services, config.service_names())?;
        let route = self.pick("Select a Route", &service.routes, service.route_names())?;
        let environment = self.pick(
            "Select an Environment",
            &service.environments,
            service.environment_names(),
        )?;
        Some((service, route, environment))
    }

    fn pick<'c, T>(&mut self, label: &str, items: &'c [T], names: Vec<String>) -> Option<&'c T> {
        if items.is_empty() {
            tracing::info!(label, "nothing to select");
            return None;
        }

        match self.prompt.choose(label, &names) {
            Ok(Some(index)) => items.get(index),
            Ok(None) => {
                tracing::info!(label, "selection cancelled");
                None
            }
            Err(err) => {
                tracing::warn!(label, error = %err, "prompt failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_config::fixtures::sample_config;
    use mockall::Sequence;

    #[test]
    fn each_step_is_scoped_to_the_chosen_service() {
        let config = sample_config();
        let mut prompt = MockPrompt::new();
        let mut seq = Sequence::new();

        prompt
            .expect_choose()
            .withf(|label, items| label == "Select a Service" && items == ["HttpBin", "DuckDuckGo"])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Some(0)));
        prompt
            .expect_choose()
            .withf(|label, items| label == "Select a Route" && items == ["get-ip", "post-json"])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Some(1)));
        prompt
            .expect_choose()
            .withf(|label, items| label == "Select an Environment" && items == ["default", "local"])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Some(1)));

        let (service, route, environment) =
            InteractiveSelector::new(&mut prompt).select(&config).unwrap();
        assert_eq!(service.name, "HttpBin");
        assert_eq!(route.name, "post-json");
        assert_eq!(environment.name, "local");
    }

    #[test]
    fn cancelling_a_later_step_aborts_everything() {
        let config = sample_config();
        let mut prompt = MockPrompt::new();
        let mut seq = Sequence::new();

        prompt
            .expect_choose()
            .withf(|label, _| label == "Select a Service")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Some(1)));
        prompt
            .expect_choose()
            .withf(|label, _| label == "Select a Route")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));

        assert!(InteractiveSelector::new(&mut prompt).select(&config).is_none());
    }

    #[test]
    fn prompt_errors_are_treated_as_cancellation() {
        let config = sample_config();
        let mut prompt = MockPrompt::new();
        prompt
            .expect_choose()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("not a terminal")));

        assert!(InteractiveSelector::new(&mut prompt).select(&config).is_none());
    }

    #[test]
    fn service_without_routes_cannot_be_selected() {
        let mut config = sample_config();
        config.services[1].routes.clear();

        let mut prompt = MockPrompt::new();
        prompt
            .expect_choose()
            .times(1)
            .returning(|_, _| Ok(Some(1)));

        assert!(InteractiveSelector::new(&mut prompt).select(&config).is_none());
    }

    #[test]
    fn empty_config_never_prompts() {
        let config = ApiConfig::default();
        let mut prompt = MockPrompt::new();
        prompt.expect_choose().never();

        assert!(InteractiveSelector::new(&mut prompt).select(&config).is_none());
    }
}
