//! Match data models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::participant::ParticipantId;
use crate::tournament::TournamentId;

/// Match ID type
pub type MatchId = i64;

/// Match status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Not played yet, or result cleared
    Pending,
    /// Winner recorded
    Done,
    /// Withdrawn. Stored and loaded but never produced by this crate.
    Canceled,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Done => "done",
            MatchStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MatchStatus::Pending),
            "done" => Some(MatchStatus::Done),
            "canceled" => Some(MatchStatus::Canceled),
            _ => None,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of the bracket drawing a match sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketSide {
    Left,
    Right,
}

impl BracketSide {
    /// Side for `slot` (1-indexed) in a round of `match_count` matches.
    /// The first half, rounded up, is drawn on the left.
    pub fn for_slot(slot: i32, match_count: usize) -> Self {
        let left = match_count.div_ceil(2);
        if (slot as usize) <= left {
            BracketSide::Left
        } else {
            BracketSide::Right
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BracketSide::Left => "left",
            BracketSide::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(BracketSide::Left),
            "right" => Some(BracketSide::Right),
            _ => None,
        }
    }
}

/// A stored match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// Round number, starting at 1
    pub round: i32,
    /// Position within the round, starting at 1
    pub slot: i32,
    /// First competitor. `None` is a bye.
    pub participant_a: Option<ParticipantId>,
    /// Second competitor. `None` is a bye.
    pub participant_b: Option<ParticipantId>,
    pub side: BracketSide,
    pub status: MatchStatus,
    /// Always one of the two competitors when set
    pub winner_id: Option<ParticipantId>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Whether `id` occupies one of the two slots
    pub fn has_participant(&self, id: ParticipantId) -> bool {
        self.participant_a == Some(id) || self.participant_b == Some(id)
    }

    /// Exactly one slot is filled
    pub fn is_bye(&self) -> bool {
        self.participant_a.is_some() != self.participant_b.is_some()
    }

    /// Filled slots, in slot order
    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.participant_a.into_iter().chain(self.participant_b)
    }
}

/// A match row after a result update, with the winner and status it held
/// just before. Both come from the same atomic store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultUpdate {
    pub recorded: Match,
    pub previous_winner: Option<ParticipantId>,
    pub previous_status: MatchStatus,
}

/// A match row to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub tournament_id: TournamentId,
    pub round: i32,
    pub slot: i32,
    pub participant_a: Option<ParticipantId>,
    pub participant_b: Option<ParticipantId>,
    pub side: BracketSide,
    pub status: MatchStatus,
}

impl NewMatch {
    pub fn is_bye(&self) -> bool {
        self.participant_a.is_some() != self.participant_b.is_some()
    }

    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.participant_a.into_iter().chain(self.participant_b)
    }
}
