//! Business logic services

pub mod anons;
pub mod catalog;
pub mod events;
pub mod lending;

use crate::{lending::RenewalPolicy, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub catalog: catalog::CatalogService,
    pub lending: lending::LendingService,
    pub events: events::EventsService,
    pub anons: anons::AnonsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, policy: RenewalPolicy) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            lending: lending::LendingService::new(repository.clone(), policy),
            events: events::EventsService::new(repository.clone()),
            anons: anons::AnonsService::new(repository.clone()),
            repository,
        }
    }
}
