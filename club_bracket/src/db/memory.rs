//! In-memory row store implementing every repository trait.
//!
//! Used by tests and by the server's `--in-memory` mode. Mirrors the
//! PostgreSQL behavior the managers rely on: sequential IDs from 1, list
//! orderings, tournament foreign keys on matches, `ON DELETE SET NULL` for
//! participant references and a win counter that never drops below zero.
//! Participant references in match rows are not checked on insert.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{MatchRepository, ParticipantRepository, TournamentRepository};
use crate::bracket::{
    BracketError, BracketResult, Match, MatchId, MatchStatus, NewMatch, ResultUpdate,
};
use crate::participant::{
    Participant, ParticipantDraft, ParticipantError, ParticipantId, ParticipantResult,
};
use crate::security::AccessCode;
use crate::tournament::{Tournament, TournamentId};

#[derive(Debug)]
struct State {
    participants: BTreeMap<ParticipantId, Participant>,
    tournaments: BTreeMap<TournamentId, Tournament>,
    matches: BTreeMap<MatchId, Match>,
    next_participant_id: ParticipantId,
    next_tournament_id: TournamentId,
    next_match_id: MatchId,
}

impl Default for State {
    fn default() -> Self {
        Self {
            participants: BTreeMap::new(),
            tournaments: BTreeMap::new(),
            matches: BTreeMap::new(),
            next_participant_id: 1,
            next_tournament_id: 1,
            next_match_id: 1,
        }
    }
}

/// Shared in-memory store. Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ParticipantRepository for MemoryStore {
    async fn create_participant(
        &self,
        draft: &ParticipantDraft,
    ) -> ParticipantResult<Participant> {
        let mut state = self.lock();
        let id = state.next_participant_id;
        state.next_participant_id += 1;

        let participant = Participant {
            id,
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            belt: draft.belt.clone(),
            age: draft.age,
            weight_kg: draft.weight_kg,
            wins: 0,
            created_at: Utc::now(),
        };
        state.participants.insert(id, participant.clone());
        Ok(participant)
    }

    async fn find_participant(&self, id: ParticipantId) -> ParticipantResult<Option<Participant>> {
        Ok(self.lock().participants.get(&id).cloned())
    }

    async fn list_participants(&self) -> ParticipantResult<Vec<Participant>> {
        let mut all: Vec<Participant> = self.lock().participants.values().cloned().collect();
        all.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then_with(|| a.last_name.cmp(&b.last_name))
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(all)
    }

    async fn update_participant(
        &self,
        id: ParticipantId,
        draft: &ParticipantDraft,
    ) -> ParticipantResult<Option<Participant>> {
        let mut state = self.lock();
        let Some(participant) = state.participants.get_mut(&id) else {
            return Ok(None);
        };

        participant.first_name = draft.first_name.clone();
        participant.last_name = draft.last_name.clone();
        participant.belt = draft.belt.clone();
        participant.age = draft.age;
        participant.weight_kg = draft.weight_kg;
        Ok(Some(participant.clone()))
    }

    async fn delete_participant(&self, id: ParticipantId) -> ParticipantResult<bool> {
        let mut state = self.lock();
        if state.participants.remove(&id).is_none() {
            return Ok(false);
        }

        for m in state.matches.values_mut() {
            for slot in [&mut m.participant_a, &mut m.participant_b, &mut m.winner_id] {
                if *slot == Some(id) {
                    *slot = None;
                }
            }
        }
        Ok(true)
    }

    async fn adjust_wins(&self, id: ParticipantId, delta: i32) -> ParticipantResult<i32> {
        let mut state = self.lock();
        let participant = state
            .participants
            .get_mut(&id)
            .ok_or(ParticipantError::NotFound(id))?;
        participant.wins = participant.wins.saturating_add(delta).max(0);
        Ok(participant.wins)
    }
}

#[async_trait]
impl TournamentRepository for MemoryStore {
    async fn create_tournament(
        &self,
        name: &str,
        access_code: &AccessCode,
    ) -> BracketResult<Tournament> {
        let mut state = self.lock();
        let id = state.next_tournament_id;
        state.next_tournament_id += 1;

        let tournament = Tournament {
            id,
            name: name.to_string(),
            access_code: access_code.clone(),
            created_at: Utc::now(),
        };
        state.tournaments.insert(id, tournament.clone());
        Ok(tournament)
    }

    async fn find_tournament(&self, id: TournamentId) -> BracketResult<Option<Tournament>> {
        Ok(self.lock().tournaments.get(&id).cloned())
    }

    async fn list_tournaments(&self) -> BracketResult<Vec<Tournament>> {
        let mut all: Vec<Tournament> = self.lock().tournaments.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(all)
    }

    async fn health_check(&self) -> BracketResult<()> {
        Ok(())
    }
}

#[async_trait]
impl MatchRepository for MemoryStore {
    async fn insert_matches(&self, matches: &[NewMatch]) -> BracketResult<Vec<Match>> {
        let mut state = self.lock();

        // Validate the whole batch first so a failure inserts nothing
        for new in matches {
            if !state.tournaments.contains_key(&new.tournament_id) {
                return Err(BracketError::TournamentNotFound(new.tournament_id));
            }
            let taken = state.matches.values().any(|m| {
                m.tournament_id == new.tournament_id && m.round == new.round && m.slot == new.slot
            });
            if taken {
                return Err(BracketError::InvalidRow(format!(
                    "slot {} of round {} already exists in tournament {}",
                    new.slot, new.round, new.tournament_id
                )));
            }
        }

        let now = Utc::now();
        let mut inserted = Vec::with_capacity(matches.len());
        for new in matches {
            let id = state.next_match_id;
            state.next_match_id += 1;

            let row = Match {
                id,
                tournament_id: new.tournament_id,
                round: new.round,
                slot: new.slot,
                participant_a: new.participant_a,
                participant_b: new.participant_b,
                side: new.side,
                status: new.status,
                winner_id: None,
                created_at: now,
            };
            state.matches.insert(id, row.clone());
            inserted.push(row);
        }

        inserted.sort_by_key(|m| (m.round, m.slot));
        Ok(inserted)
    }

    async fn find_match(&self, id: MatchId) -> BracketResult<Option<Match>> {
        Ok(self.lock().matches.get(&id).cloned())
    }

    async fn list_by_tournament(&self, tournament_id: TournamentId) -> BracketResult<Vec<Match>> {
        let mut rows: Vec<Match> = self
            .lock()
            .matches
            .values()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| (m.round, m.slot));
        Ok(rows)
    }

    async fn update_result(
        &self,
        id: MatchId,
        winner: Option<ParticipantId>,
        status: MatchStatus,
    ) -> BracketResult<Option<ResultUpdate>> {
        let mut state = self.lock();
        let Some(row) = state.matches.get_mut(&id) else {
            return Ok(None);
        };
        let previous_winner = std::mem::replace(&mut row.winner_id, winner);
        let previous_status = std::mem::replace(&mut row.status, status);
        Ok(Some(ResultUpdate {
            recorded: row.clone(),
            previous_winner,
            previous_status,
        }))
    }

    async fn max_round(&self, tournament_id: TournamentId) -> BracketResult<Option<i32>> {
        Ok(self
            .lock()
            .matches
            .values()
            .filter(|m| m.tournament_id == tournament_id)
            .map(|m| m.round)
            .max())
    }
}
