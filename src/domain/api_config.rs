use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of the API configuration document: an ordered list of services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub services: Vec<Service>,
}

/// A named API with its routes and deployment environments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub environments: Vec<Environment>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// A deployment target of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub auth: Auth,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

/// Credentials attached to an environment.
///
/// Stored as configured; requests are not signed with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Auth {
    #[default]
    None,
    Basic {
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
    },
    Bearer {
        #[serde(default)]
        token: String,
    },
}

/// One HTTP operation on a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub body: String,
}

/// Configuration entries addressed by name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Service {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Route {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Environment {
    fn name(&self) -> &str {
        &self.name
    }
}

fn names_of<T: Named>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.name().to_string()).collect()
}

/// Exact, case-sensitive lookup. The first entry wins when names repeat.
fn find_by_name<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
    items.iter().find(|item| item.name() == name)
}

impl ApiConfig {
    pub fn service_names(&self) -> Vec<String> {
        names_of(&self.services)
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        find_by_name(&self.services, name)
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Service {
    pub fn route_names(&self) -> Vec<String> {
        names_of(&self.routes)
    }

    pub fn route(&self, name: &str) -> Option<&Route> {
        find_by_name(&self.routes, name)
    }

    pub fn environment_names(&self) -> Vec<String> {
        names_of(&self.environments)
    }

    pub fn environment(&self, name: &str) -> Option<&Environment> {
        find_by_name(&self.environments, name)
    }
}
