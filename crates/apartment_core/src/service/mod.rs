//! Core use-case services.
//!
//! # Responsibility
//! - Combine graph edits and repository calls into use-case level APIs.
//! - Apply opt-in validation before writes.

pub mod apartment_service;
