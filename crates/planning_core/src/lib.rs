//! Performer planning core for network infrastructure projects.
//!
//! Walks planning update requests (knots with their cross-connects, oms,
//! dboards, focables) and persists one performer per requested login.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, PlanningConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::entity::{ChildSection, EntityDescriptor, EntityId, EntityKind};
pub use model::outcome::{
    PerformersBySection, PlanningResponse, SectionOutcome, StatusResponse, UpdateOutcome,
};
pub use model::performer::{NewPerformer, Performer, PerformerId, PerformerValidationError};
pub use model::request::{
    CreateBlock, KnotUpdate, PerformerDescriptor, PerformersUpdate, PlanningUpdateRequest,
    Section, UpdateEntry,
};
pub use repo::memory_repo::InMemoryPerformerRepository;
pub use repo::performer_repo::{
    PerformerRepository, RepoError, RepoResult, SqlitePerformerRepository,
};
pub use repo::project_repo::{Project, ProjectRepository, SqliteProjectRepository, UserId};
pub use service::planning_service::{apply_update_atomically, PlanningService};
pub use service::project_service::ProjectService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
