//! Tournament data models.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bracket::Match;
use crate::participant::ParticipantId;
use crate::security::AccessCode;

/// Tournament ID type
pub type TournamentId = i64;

/// A tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tournament {
    /// Tournament ID
    pub id: TournamentId,
    /// Display name
    pub name: String,
    /// Write gate for results. Never serialized.
    #[serde(skip)]
    pub access_code: AccessCode,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

/// A tournament together with all of its matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentBracket {
    pub tournament: Tournament,
    /// Ordered by round, then slot
    pub matches: Vec<Match>,
}

impl TournamentBracket {
    /// Highest round number present, if any match exists
    pub fn max_round(&self) -> Option<i32> {
        self.matches.iter().map(|m| m.round).max()
    }

    /// Round numbers present, ascending
    pub fn rounds(&self) -> Vec<i32> {
        self.matches
            .iter()
            .map(|m| m.round)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Matches of one round, in slot order
    pub fn round(&self, round: i32) -> impl Iterator<Item = &Match> + '_ {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Winner of the highest round, when that round holds a single decided match
    pub fn champion(&self) -> Option<ParticipantId> {
        let top = self.max_round()?;
        let mut finals = self.round(top);
        let only = finals.next()?;
        if finals.next().is_some() {
            return None;
        }
        only.winner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{BracketSide, MatchStatus};

    fn m(id: i64, round: i32, slot: i32, winner: Option<i64>) -> Match {
        Match {
            id,
            tournament_id: 1,
            round,
            slot,
            participant_a: Some(1),
            participant_b: Some(2),
            side: BracketSide::Left,
            status: if winner.is_some() {
                MatchStatus::Done
            } else {
                MatchStatus::Pending
            },
            winner_id: winner,
            created_at: Utc::now(),
        }
    }

    fn bracket(matches: Vec<Match>) -> TournamentBracket {
        TournamentBracket {
            tournament: Tournament {
                id: 1,
                name: "Test".to_string(),
                access_code: AccessCode::from_stored("ABC123"),
                created_at: Utc::now(),
            },
            matches,
        }
    }

    #[test]
    fn test_rounds_and_max_round() {
        let b = bracket(vec![m(1, 1, 1, None), m(2, 1, 2, None), m(3, 2, 1, None)]);
        assert_eq!(b.rounds(), vec![1, 2]);
        assert_eq!(b.max_round(), Some(2));
        assert_eq!(b.round(1).count(), 2);
    }

    #[test]
    fn test_empty_bracket() {
        let b = bracket(vec![]);
        assert_eq!(b.max_round(), None);
        assert_eq!(b.champion(), None);
    }

    #[test]
    fn test_champion_requires_single_decided_final() {
        let undecided = bracket(vec![m(1, 1, 1, Some(1)), m(2, 2, 1, None)]);
        assert_eq!(undecided.champion(), None);

        let decided = bracket(vec![m(1, 1, 1, Some(1)), m(2, 2, 1, Some(2))]);
        assert_eq!(decided.champion(), Some(2));

        let two_in_top_round = bracket(vec![m(1, 1, 1, Some(1)), m(2, 1, 2, Some(2))]);
        assert_eq!(two_in_top_round.champion(), None);
    }

    #[test]
    fn test_access_code_not_serialized() {
        let json = serde_json::to_string(&bracket(vec![]).tournament).unwrap();
        assert!(!json.contains("ABC123"));
        assert!(!json.contains("access_code"));
    }
}
