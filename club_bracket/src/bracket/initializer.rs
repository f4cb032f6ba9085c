//! Round-1 bracket generation.
//!
//! Selected participants are shuffled with a uniform Fisher–Yates permutation
//! and paired off in order: positions `2k` and `2k + 1` meet in slot `k + 1`.
//! An odd participant out gets a bye instead of being dropped. Seeding is
//! deliberately random, so two draws over the same selection usually differ.

use std::sync::Arc;

use rand::{Rng, seq::SliceRandom};

use super::{
    errors::BracketResult,
    models::{BracketSide, Match, MatchStatus, NewMatch},
};
use crate::db::MatchRepository;
use crate::participant::ParticipantId;
use crate::tournament::TournamentId;

/// Pair participants in the order given, without shuffling.
pub fn pair_round_one(tournament_id: TournamentId, ordered: &[ParticipantId]) -> Vec<NewMatch> {
    let match_count = ordered.len().div_ceil(2);

    ordered
        .chunks(2)
        .enumerate()
        .map(|(k, pair)| {
            let slot = k as i32 + 1;
            NewMatch {
                tournament_id,
                round: 1,
                slot,
                participant_a: pair.first().copied(),
                participant_b: pair.get(1).copied(),
                side: BracketSide::for_slot(slot, match_count),
                status: MatchStatus::Pending,
            }
        })
        .collect()
}

/// Shuffle the selection with `rng`, then pair it.
pub fn draw_round_one<R: Rng + ?Sized>(
    tournament_id: TournamentId,
    participant_ids: &[ParticipantId],
    rng: &mut R,
) -> Vec<NewMatch> {
    let mut shuffled = participant_ids.to_vec();
    shuffled.shuffle(rng);
    pair_round_one(tournament_id, &shuffled)
}

/// Creates and stores the round-1 matches of a new tournament
#[derive(Clone)]
pub struct BracketInitializer {
    matches: Arc<dyn MatchRepository>,
}

impl BracketInitializer {
    pub fn new(matches: Arc<dyn MatchRepository>) -> Self {
        Self { matches }
    }

    /// Draw round 1 for `participant_ids` and persist it in one bulk insert.
    ///
    /// An empty selection produces no matches and issues no insert.
    pub async fn initialize(
        &self,
        tournament_id: TournamentId,
        participant_ids: &[ParticipantId],
    ) -> BracketResult<Vec<Match>> {
        let draw = draw_round_one(tournament_id, participant_ids, &mut rand::rng());

        if draw.is_empty() {
            log::info!("Tournament {} has no participants, no matches drawn", tournament_id);
            return Ok(Vec::new());
        }

        let byes = draw.iter().filter(|m| m.is_bye()).count();
        let matches = self.matches.insert_matches(&draw).await?;

        log::info!(
            "Drew {} round-1 match(es) for tournament {} ({} bye)",
            matches.len(),
            tournament_id,
            byes
        );

        Ok(matches)
    }
}
