//! Core domain logic for the apartment rental model.
//! This crate is the single source of truth for relationship invariants.

pub mod config;
pub mod db;
pub mod graph;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, DbConfig, LogConfig, ServiceConfig};
pub use db::{open_configured, open_db, open_db_in_memory, DbError, DbResult};
pub use graph::{GraphError, GraphResult, PendingDeletions, RentalGraph};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::apartment::{Apartment, FurnishingStatus};
pub use model::keys::{
    ApartmentId, ApartmentKey, OwnerId, OwnerKey, ReviewId, ReviewKey, ReviewerId, ReviewerKey,
};
pub use model::owner::Owner;
pub use model::person::PersonInfo;
pub use model::review::Review;
pub use model::reviewer::Reviewer;
pub use model::validation::{ValidationError, MAX_RATING, MIN_RATING};
pub use repo::apartment_repo::SqliteApartmentRepository;
pub use repo::owner_repo::SqliteOwnerRepository;
pub use repo::review_repo::SqliteReviewRepository;
pub use repo::reviewer_repo::SqliteReviewerRepository;
pub use repo::{EntityRepository, RepoError, RepoResult};
pub use service::apartment_service::{ApartmentService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
