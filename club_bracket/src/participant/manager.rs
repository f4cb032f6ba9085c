//! Participant manager for registering and editing club members.

use std::sync::Arc;

use super::{
    errors::{ParticipantError, ParticipantResult},
    models::{Participant, ParticipantDraft, ParticipantId},
};
use crate::db::ParticipantRepository;

/// Participant manager
#[derive(Clone)]
pub struct ParticipantManager {
    repo: Arc<dyn ParticipantRepository>,
}

impl ParticipantManager {
    /// Create a new participant manager
    pub fn new(repo: Arc<dyn ParticipantRepository>) -> Self {
        Self { repo }
    }

    /// Register a new participant with zero wins
    ///
    /// # Errors
    ///
    /// Returns a validation error if a required field is blank, or a
    /// database error if the insert fails.
    pub async fn register(&self, draft: &ParticipantDraft) -> ParticipantResult<Participant> {
        let draft = draft.validated()?;
        let participant = self.repo.create_participant(&draft).await?;

        log::info!(
            "Registered participant {} ({}, {})",
            participant.id,
            participant.full_name(),
            participant.belt
        );

        Ok(participant)
    }

    /// Get a participant by ID
    pub async fn get(&self, id: ParticipantId) -> ParticipantResult<Participant> {
        self.repo
            .find_participant(id)
            .await?
            .ok_or(ParticipantError::NotFound(id))
    }

    /// List all participants, most wins first
    pub async fn list(&self) -> ParticipantResult<Vec<Participant>> {
        self.repo.list_participants().await
    }

    /// Replace a participant's descriptive fields. The win count is untouched.
    pub async fn update(
        &self,
        id: ParticipantId,
        draft: &ParticipantDraft,
    ) -> ParticipantResult<Participant> {
        let draft = draft.validated()?;
        let participant = self
            .repo
            .update_participant(id, &draft)
            .await?
            .ok_or(ParticipantError::NotFound(id))?;

        log::debug!("Updated participant {}", id);
        Ok(participant)
    }

    /// Delete a participant. Match slots that referenced them become byes.
    pub async fn remove(&self, id: ParticipantId) -> ParticipantResult<()> {
        if !self.repo.delete_participant(id).await? {
            return Err(ParticipantError::NotFound(id));
        }

        log::info!("Deleted participant {}", id);
        Ok(())
    }
}
