//! Apartment use-case service.
//!
//! # Responsibility
//! - Provide list, create, read, update and delete entry points for
//!   apartments.
//! - Keep the graph and storage in step for each call.
//!
//! # Invariants
//! - A failed create leaves no new apartment behind in the graph.
//! - Validation runs only when `ServiceConfig::validate_writes` is set.

use crate::config::ServiceConfig;
use crate::graph::{GraphError, RentalGraph};
use crate::model::apartment::Apartment;
use crate::model::keys::{ApartmentId, ApartmentKey, OwnerKey};
use crate::model::validation::ValidationError;
use crate::repo::{EntityRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for apartment use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    Graph(GraphError),
    Repo(RepoError),
    /// Update requested for an apartment that was never saved.
    NotPersisted(ApartmentKey),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Graph(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::NotPersisted(key) => write!(f, "{key} has not been saved yet"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Graph(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotPersisted(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<GraphError> for ServiceError {
    fn from(value: GraphError) -> Self {
        Self::Graph(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Graph(err) => Self::Graph(err),
            other => Self::Repo(other),
        }
    }
}

/// Use-case service wrapper for apartment persistence.
pub struct ApartmentService<R: EntityRepository<Key = ApartmentKey>> {
    repo: R,
    config: ServiceConfig,
}

impl<R: EntityRepository<Key = ApartmentKey>> ApartmentService<R> {
    /// Creates a service that never validates.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, ServiceConfig::default())
    }

    pub fn with_config(repo: R, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// Loads every stored apartment into `graph`.
    pub fn find_all_apartments(&self, graph: &mut RentalGraph) -> ServiceResult<Vec<ApartmentKey>> {
        Ok(self.repo.find_all(graph)?)
    }

    /// Adds a new apartment, optionally under `owner`, and saves it.
    ///
    /// # Contract
    /// - The owner row is inserted first when the owner is unsaved.
    /// - On any error the apartment is removed from `graph` again.
    pub fn create_apartment(
        &self,
        graph: &mut RentalGraph,
        apartment: Apartment,
        owner: Option<OwnerKey>,
    ) -> ServiceResult<ApartmentKey> {
        if self.config.validate_writes {
            apartment.validate()?;
            if let Some(owner) = owner.and_then(|owner| graph.owner(owner)) {
                owner.validate()?;
            }
        }

        let key = graph.insert_apartment(apartment);
        let linked = match owner {
            Some(owner) => graph.add_apartment(owner, key).map_err(ServiceError::from),
            None => Ok(()),
        };
        let saved = linked.and_then(|()| self.repo.save(graph, key).map_err(ServiceError::from));

        match saved {
            Ok(_) => Ok(key),
            Err(err) => {
                graph.delete_apartment(key)?;
                Err(err)
            }
        }
    }

    /// Loads one apartment with its reviews.
    pub fn read_apartment(
        &self,
        graph: &mut RentalGraph,
        id: ApartmentId,
    ) -> ServiceResult<Option<ApartmentKey>> {
        Ok(self.repo.find_by_id(graph, id)?)
    }

    /// Writes the current state of a saved apartment and its reviews.
    pub fn update_apartment(
        &self,
        graph: &mut RentalGraph,
        key: ApartmentKey,
    ) -> ServiceResult<ApartmentId> {
        let apartment = graph
            .apartment(key)
            .ok_or(GraphError::UnknownApartment(key))?;
        if apartment.id().is_none() {
            return Err(ServiceError::NotPersisted(key));
        }
        if self.config.validate_writes {
            apartment.validate()?;
            for review in apartment.reviews() {
                if let Some(review) = graph.review(*review) {
                    review.validate()?;
                }
            }
        }
        Ok(self.repo.save(graph, key)?)
    }

    /// Removes an apartment and its reviews from `graph` and storage.
    pub fn delete_apartment(&self, graph: &mut RentalGraph, key: ApartmentKey) -> ServiceResult<()> {
        graph.delete_apartment(key)?;
        self.repo.flush(graph)?;
        Ok(())
    }
}
