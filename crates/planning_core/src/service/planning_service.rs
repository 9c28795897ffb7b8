//! Planning update dispatch.
//!
//! # Responsibility
//! - Route each present request section to the generic section handler.
//! - Create one performer per descriptor, recursing from knots into their
//!   cross-connects.
//!
//! # Invariants
//! - Processing order: knots, oms, dboards, focables; then list order.
//! - Absent sections, `update` lists and create blocks are skipped, never
//!   treated as errors.
//! - The first failed write aborts the walk. Earlier writes stay committed
//!   unless the walk runs inside `apply_update_atomically`.

use crate::model::entity::{EntityId, EntityKind};
use crate::model::outcome::{PerformersBySection, PlanningResponse, SectionOutcome, UpdateOutcome};
use crate::model::performer::{NewPerformer, Performer};
use crate::model::request::{PerformerDescriptor, PlanningUpdateRequest, Section, UpdateEntry};
use crate::repo::performer_repo::{
    PerformerRepository, RepoResult, SqlitePerformerRepository,
};
use log::{debug, error, info};
use rusqlite::{Connection, TransactionBehavior};
use std::time::Instant;

/// Performer planning service over any performer repository.
pub struct PlanningService<R: PerformerRepository> {
    repo: R,
}

impl<R: PerformerRepository> PlanningService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Applies a planning update and assembles the success envelope.
    ///
    /// # Side effects
    /// - One repository insert per performer descriptor.
    /// - Emits `planning_update` start/ok/error events.
    pub fn handle_performers(
        &self,
        request: &PlanningUpdateRequest,
    ) -> RepoResult<PlanningResponse> {
        let started_at = Instant::now();
        info!("event=planning_update module=service status=start");

        match self.dispatch(request) {
            Ok(performers) => {
                info!(
                    "event=planning_update module=service status=ok created={} duration_ms={}",
                    performers.created_count(),
                    started_at.elapsed().as_millis()
                );
                Ok(PlanningResponse::success(performers))
            }
            Err(err) => {
                error!(
                    "event=planning_update module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Lists stored performers of one entity.
    pub fn list_performers(
        &self,
        kind: EntityKind,
        owner_id: EntityId,
    ) -> RepoResult<Vec<Performer>> {
        self.repo.list_performers(kind, owner_id)
    }

    fn dispatch(&self, request: &PlanningUpdateRequest) -> RepoResult<PerformersBySection> {
        let mut performers = PerformersBySection::default();
        if let Some(section) = &request.aor_knots {
            performers.aor_knots = Some(self.handle_section(EntityKind::Knot, section)?);
        }
        if let Some(section) = &request.aor_oms {
            performers.aor_oms = Some(self.handle_section(EntityKind::Om, section)?);
        }
        if let Some(section) = &request.aor_dboards {
            performers.aor_dboards = Some(self.handle_section(EntityKind::Dboard, section)?);
        }
        if let Some(section) = &request.aor_focables {
            performers.aor_focables = Some(self.handle_section(EntityKind::Focable, section)?);
        }
        Ok(performers)
    }

    /// Handles one `{ update?: [..] }` section of `kind`.
    pub fn handle_section<U: UpdateEntry>(
        &self,
        kind: EntityKind,
        section: &Section<U>,
    ) -> RepoResult<SectionOutcome> {
        let Some(updates) = &section.update else {
            return Ok(SectionOutcome::default());
        };
        Ok(SectionOutcome {
            update: Some(self.handle_entity_performers(kind, updates)?),
        })
    }

    /// Handles an `update` list: create blocks first, then nested sections,
    /// entry by entry.
    pub fn handle_entity_performers<U: UpdateEntry>(
        &self,
        kind: EntityKind,
        updates: &[U],
    ) -> RepoResult<UpdateOutcome> {
        let descriptor = kind.descriptor();
        let mut outcome = UpdateOutcome::new(kind);

        for entry in updates {
            if let Some(create) = entry.create_block().and_then(|block| block.create.as_deref()) {
                let created = self.create_performers(kind, entry.entity_id(), create)?;
                outcome.push_created(created);
            }

            if let (Some(child), Some(section)) = (descriptor.child, entry.child_section()) {
                outcome.push_children(self.handle_section(child.kind, section)?);
            }
        }

        Ok(outcome)
    }

    /// Persists one performer per descriptor for the owning entity.
    pub fn create_performers(
        &self,
        kind: EntityKind,
        owner_id: EntityId,
        descriptors: &[PerformerDescriptor],
    ) -> RepoResult<Vec<Performer>> {
        let mut performers = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let performer = self.repo.insert_performer(&NewPerformer::new(
                kind,
                owner_id,
                descriptor.btu_user_login.as_str(),
            ))?;
            performers.push(performer);
        }

        debug!(
            "event=performer_create module=service status=ok kind={} owner_id={} count={}",
            kind,
            owner_id,
            performers.len()
        );
        Ok(performers)
    }
}

/// Applies a planning update inside one SQLite transaction.
///
/// Any failed write rolls back every performer the request created.
pub fn apply_update_atomically(
    conn: &mut Connection,
    request: &PlanningUpdateRequest,
) -> RepoResult<PlanningResponse> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let response = {
        let service = PlanningService::new(SqlitePerformerRepository::try_new(&tx)?);
        service.handle_performers(request)?
    };
    tx.commit()?;
    Ok(response)
}
