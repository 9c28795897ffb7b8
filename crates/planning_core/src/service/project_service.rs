//! Project planning flag use-case.

use crate::model::entity::EntityId;
use crate::model::outcome::StatusResponse;
use crate::repo::project_repo::{Project, ProjectRepository, UserId};
use crate::repo::performer_repo::RepoResult;
use log::{info, warn};

pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Marks a project owned by `user_id` as being in planning.
    ///
    /// Returns `RepoError::NotFound(project_id)` when the project is missing
    /// or owned by someone else.
    pub fn set_planning(
        &self,
        project_id: EntityId,
        user_id: UserId,
    ) -> RepoResult<StatusResponse> {
        match self.repo.set_planning(project_id, user_id) {
            Ok(()) => {
                info!("event=set_planning module=service status=ok project_id={project_id}");
                Ok(StatusResponse::success())
            }
            Err(err) => {
                warn!(
                    "event=set_planning module=service status=error project_id={project_id} error={err}"
                );
                Err(err)
            }
        }
    }

    pub fn find_owned_project(
        &self,
        project_id: EntityId,
        user_id: UserId,
    ) -> RepoResult<Option<Project>> {
        self.repo.find_owned_project(project_id, user_id)
    }
}
