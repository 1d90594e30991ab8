//! Rental domain model.
//!
//! # Responsibility
//! - Define the entity records shared by graph, repository and service layers.
//! - Keep relationship references as graph keys instead of owned pointers.
//!
//! # Invariants
//! - Persisted ids are assigned by repositories only and never change.
//! - Relationship fields are mutated only through `RentalGraph` operations.
//!
//! # See also
//! - crate::graph

pub mod apartment;
pub mod keys;
pub mod owner;
pub mod person;
pub mod review;
pub mod reviewer;
pub mod validation;
