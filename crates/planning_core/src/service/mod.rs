//! Planning use-case services.
//!
//! # Responsibility
//! - Walk planning update requests and fan out into performer creation.
//! - Flip the planning flag on projects owned by the caller.

pub mod planning_service;
pub mod project_service;
