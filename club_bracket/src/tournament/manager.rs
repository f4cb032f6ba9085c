//! Tournament manager for creating brackets and recording results.

use std::collections::HashSet;
use std::sync::Arc;

use super::models::{Tournament, TournamentBracket, TournamentId};
use crate::bracket::{
    BracketError, BracketInitializer, BracketResult, MatchId, RecordedResult, ResultRecorder,
    WinCreditPolicy,
};
use crate::db::{MatchRepository, ParticipantRepository, Repositories, TournamentRepository};
use crate::participant::ParticipantId;
use crate::security::AccessCode;

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    tournaments: Arc<dyn TournamentRepository>,
    participants: Arc<dyn ParticipantRepository>,
    matches: Arc<dyn MatchRepository>,
    initializer: BracketInitializer,
    recorder: ResultRecorder,
}

impl TournamentManager {
    /// Create a new tournament manager over a set of repositories
    pub fn new(repos: &Repositories, policy: WinCreditPolicy) -> Self {
        Self {
            tournaments: repos.tournaments.clone(),
            participants: repos.participants.clone(),
            matches: repos.matches.clone(),
            initializer: BracketInitializer::new(repos.matches.clone()),
            recorder: ResultRecorder::new(
                repos.matches.clone(),
                repos.participants.clone(),
                policy,
            ),
        }
    }

    pub fn win_credit_policy(&self) -> WinCreditPolicy {
        self.recorder.policy()
    }

    /// Create a tournament and draw its round-1 bracket
    ///
    /// The selection is checked before anything is written. After that the
    /// tournament row and the match rows are two separate writes: if the
    /// match insert fails the error is returned and the tournament remains,
    /// without matches.
    ///
    /// # Errors
    ///
    /// * `InvalidName` - blank name
    /// * `DuplicateParticipant` - an ID appears twice in the selection
    /// * `UnknownParticipant` - an ID does not exist
    pub async fn create_tournament(
        &self,
        name: &str,
        participant_ids: &[ParticipantId],
    ) -> BracketResult<TournamentBracket> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BracketError::InvalidName);
        }

        let mut seen = HashSet::with_capacity(participant_ids.len());
        for &id in participant_ids {
            if !seen.insert(id) {
                return Err(BracketError::DuplicateParticipant(id));
            }
        }

        for &id in participant_ids {
            if self.participants.find_participant(id).await?.is_none() {
                return Err(BracketError::UnknownParticipant(id));
            }
        }

        let tournament = self
            .tournaments
            .create_tournament(name, &AccessCode::generate())
            .await?;

        log::info!(
            "Created tournament {} '{}' with {} participant(s)",
            tournament.id,
            tournament.name,
            participant_ids.len()
        );

        let matches = self
            .initializer
            .initialize(tournament.id, participant_ids)
            .await?;

        Ok(TournamentBracket {
            tournament,
            matches,
        })
    }

    /// Get tournament by ID
    pub async fn get_tournament(&self, tournament_id: TournamentId) -> BracketResult<Tournament> {
        self.tournaments
            .find_tournament(tournament_id)
            .await?
            .ok_or(BracketError::TournamentNotFound(tournament_id))
    }

    /// List all tournaments, newest first
    pub async fn list_tournaments(&self) -> BracketResult<Vec<Tournament>> {
        self.tournaments.list_tournaments().await
    }

    /// Tournament with all of its matches
    pub async fn get_bracket(
        &self,
        tournament_id: TournamentId,
    ) -> BracketResult<TournamentBracket> {
        let tournament = self.get_tournament(tournament_id).await?;
        let matches = self.matches.list_by_tournament(tournament_id).await?;
        Ok(TournamentBracket {
            tournament,
            matches,
        })
    }

    /// Check a submitted access code
    ///
    /// # Errors
    ///
    /// `AccessDenied` if the code does not match
    pub async fn verify_access_code(
        &self,
        tournament_id: TournamentId,
        code: &str,
    ) -> BracketResult<Tournament> {
        let tournament = self.get_tournament(tournament_id).await?;
        if !tournament.access_code.matches(code) {
            log::warn!("Rejected access code for tournament {}", tournament_id);
            return Err(BracketError::AccessDenied(tournament_id));
        }
        Ok(tournament)
    }

    /// Record (`Some`) or clear (`None`) a match winner, gated by the
    /// tournament's access code
    pub async fn record_result(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
        winner: Option<ParticipantId>,
        code: &str,
    ) -> BracketResult<RecordedResult> {
        self.verify_access_code(tournament_id, code).await?;

        let found = self
            .matches
            .find_match(match_id)
            .await?
            .ok_or(BracketError::MatchNotFound(match_id))?;
        if found.tournament_id != tournament_id {
            return Err(BracketError::MatchNotInTournament {
                match_id,
                tournament_id,
            });
        }

        self.recorder.record(match_id, winner).await
    }

    /// Store health check
    pub async fn health_check(&self) -> BracketResult<()> {
        self.tournaments.health_check().await
    }
}
