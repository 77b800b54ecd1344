use std::{collections::HashMap, error::Error as StdError};
use thiserror::Error;

/// Resolution of a logical service name to a base URL. Implementations: static
/// configuration, a discovery client, etc.
#[trait_variant::make(Send)]
pub trait ServiceResolver
where
    Self: Clone + Send + Sync + 'static,
{
    type Error: StdError + Send + Sync + 'static;

    async fn resolve(&self, service: &str) -> Result<String, Self::Error>;
}

/// Resolver backed by a fixed table of service names and base URLs taken from
/// configuration. Trailing slashes are trimmed at construction, such that
/// resolved base URLs can be joined with absolute paths.
#[derive(Debug, Clone)]
pub struct StaticServiceResolver {
    services: HashMap<String, String>,
}

impl StaticServiceResolver {
    pub fn new(services: HashMap<String, String>) -> Self {
        let services = services
            .into_iter()
            .map(|(service, url)| (service, url.trim_end_matches('/').to_string()))
            .collect();
        Self { services }
    }
}

impl ServiceResolver for StaticServiceResolver {
    type Error = ResolveError;

    async fn resolve(&self, service: &str) -> Result<String, Self::Error> {
        self.services
            .get(service)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownService(service.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown service {0}")]
    UnknownService(String),
}
