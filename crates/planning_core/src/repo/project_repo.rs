//! Project repository: the planning flag and ownership lookups.
//!
//! # Invariants
//! - A project is only visible to the user recorded in `created_by`.

use crate::model::entity::EntityId;
use crate::repo::performer_repo::{RepoError, RepoResult};
use crate::repo::schema::ensure_table_ready;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Identifier of the authenticated user owning projects.
pub type UserId = i64;

/// Project read model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub created_by: UserId,
    pub is_planning: bool,
}

pub trait ProjectRepository {
    /// Creates one project owned by `created_by`.
    fn create_project(&self, name: &str, created_by: UserId) -> RepoResult<Project>;
    /// Loads a project only if `user_id` owns it.
    fn find_owned_project(
        &self,
        project_id: EntityId,
        user_id: UserId,
    ) -> RepoResult<Option<Project>>;
    /// Flags an owned project as being in planning.
    fn set_planning(&self, project_id: EntityId, user_id: UserId) -> RepoResult<()>;
}

pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "projects",
            &["id", "name", "created_by", "is_planning", "updated_at"],
        )?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, name: &str, created_by: UserId) -> RepoResult<Project> {
        self.conn.execute(
            "INSERT INTO projects (name, created_by) VALUES (?1, ?2);",
            params![name, created_by],
        )?;
        let id = self.conn.last_insert_rowid();
        self.find_owned_project(id, created_by)?
            .ok_or(RepoError::NotFound(id))
    }

    fn find_owned_project(
        &self,
        project_id: EntityId,
        user_id: UserId,
    ) -> RepoResult<Option<Project>> {
        self.conn
            .query_row(
                "SELECT id, name, created_by, is_planning
                 FROM projects
                 WHERE id = ?1 AND created_by = ?2;",
                params![project_id, user_id],
                |row| Ok(parse_project_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn set_planning(&self, project_id: EntityId, user_id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE projects
             SET
                is_planning = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1 AND created_by = ?2;",
            params![project_id, user_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(project_id));
        }

        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let is_planning = match row.get::<_, i64>("is_planning")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_planning value `{other}` in projects.is_planning"
            )));
        }
    };

    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        created_by: row.get("created_by")?,
        is_planning,
    })
}
