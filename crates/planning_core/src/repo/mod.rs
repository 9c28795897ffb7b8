//! Persistence seams for the planning core.
//!
//! # Responsibility
//! - Define the insert/list contract performer handlers depend on.
//! - Keep SQL and table naming inside the repository boundary.
//!
//! # Invariants
//! - Writes call `NewPerformer::validate()` before touching storage.
//! - SQLite repositories refuse connections that are not fully migrated.

pub mod memory_repo;
pub mod performer_repo;
pub mod project_repo;
mod schema;
