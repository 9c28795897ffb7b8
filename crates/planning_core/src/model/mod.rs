//! Planning domain model.
//!
//! # Responsibility
//! - Describe the five performer-bearing entity kinds and their field names.
//! - Define the typed update request and the outcome tree returned for it.
//!
//! # Invariants
//! - Every performer belongs to exactly one owning entity.
//! - Field names that differ per kind are read from `EntityKind::descriptor`,
//!   never spelled out in handlers.

pub mod entity;
pub mod outcome;
pub mod performer;
pub mod request;
