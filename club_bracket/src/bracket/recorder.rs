//! Match result recording and tournament win credits.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    errors::{BracketError, BracketResult},
    models::{Match, MatchId, MatchStatus, ResultUpdate},
};
use crate::db::{MatchRepository, ParticipantRepository};
use crate::participant::ParticipantId;

/// How final-round results translate into participant win counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinCreditPolicy {
    /// Every final-round winner submission adds a win; resets never take one
    /// back. Recording A, resetting, and recording A again credits A twice.
    /// Only for compatibility with data written under that rule.
    Legacy,
    /// The credit follows the stored winner: re-recording the same winner is
    /// a no-op, changing the winner moves the win, and a reset revokes it.
    #[default]
    Reconciled,
}

impl WinCreditPolicy {
    /// Win adjustments for a final-round submission.
    ///
    /// `previous_status` and `previous_winner` are what the match held
    /// right before this submission replaced them.
    ///
    /// Returns `(credit, revoke)`: who gains a win and who loses one.
    pub fn credit_changes(
        self,
        previous_status: MatchStatus,
        previous_winner: Option<ParticipantId>,
        winner: Option<ParticipantId>,
    ) -> (Option<ParticipantId>, Option<ParticipantId>) {
        match self {
            WinCreditPolicy::Legacy => (winner, None),
            WinCreditPolicy::Reconciled => {
                let credited_before = if previous_status == MatchStatus::Done {
                    previous_winner
                } else {
                    None
                };

                if credited_before == winner {
                    (None, None)
                } else {
                    (winner, credited_before)
                }
            }
        }
    }
}

impl FromStr for WinCreditPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(WinCreditPolicy::Legacy),
            "reconciled" => Ok(WinCreditPolicy::Reconciled),
            other => Err(format!(
                "unknown win credit policy '{other}', expected 'legacy' or 'reconciled'"
            )),
        }
    }
}

impl fmt::Display for WinCreditPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinCreditPolicy::Legacy => f.write_str("legacy"),
            WinCreditPolicy::Reconciled => f.write_str("reconciled"),
        }
    }
}

/// Outcome of recording or clearing a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedResult {
    /// The match as read back from the store after the update
    #[serde(rename = "match")]
    pub recorded: Match,
    /// Whether the match was in the tournament's highest round
    pub final_round: bool,
    /// Participant whose win count went up
    pub credited: Option<ParticipantId>,
    /// Participant whose win count went down
    pub revoked: Option<ParticipantId>,
}

/// Records match winners and credits tournament wins
#[derive(Clone)]
pub struct ResultRecorder {
    matches: Arc<dyn MatchRepository>,
    participants: Arc<dyn ParticipantRepository>,
    policy: WinCreditPolicy,
}

impl ResultRecorder {
    pub fn new(
        matches: Arc<dyn MatchRepository>,
        participants: Arc<dyn ParticipantRepository>,
        policy: WinCreditPolicy,
    ) -> Self {
        Self {
            matches,
            participants,
            policy,
        }
    }

    pub fn policy(&self) -> WinCreditPolicy {
        self.policy
    }

    /// Mark `winner` as the winner of `match_id`
    pub async fn record_winner(
        &self,
        match_id: MatchId,
        winner: ParticipantId,
    ) -> BracketResult<RecordedResult> {
        self.record(match_id, Some(winner)).await
    }

    /// Clear the result of `match_id`
    pub async fn reset(&self, match_id: MatchId) -> BracketResult<RecordedResult> {
        self.record(match_id, None).await
    }

    /// Set (`Some`) or clear (`None`) the winner of a match.
    ///
    /// Setting marks the match `done`; clearing returns it to `pending`.
    /// If the match is in the tournament's highest round at the time of the
    /// call, win counts are adjusted according to the recorder's policy.
    ///
    /// # Errors
    ///
    /// * `MatchNotFound` - no such match
    /// * `MatchCanceled` - the match was withdrawn
    /// * `WinnerNotInMatch` - `winner` is not one of the two competitors;
    ///   nothing is written
    pub async fn record(
        &self,
        match_id: MatchId,
        winner: Option<ParticipantId>,
    ) -> BracketResult<RecordedResult> {
        let previous = self
            .matches
            .find_match(match_id)
            .await?
            .ok_or(BracketError::MatchNotFound(match_id))?;

        if previous.status == MatchStatus::Canceled {
            return Err(BracketError::MatchCanceled(match_id));
        }

        if let Some(winner_id) = winner
            && !previous.has_participant(winner_id)
        {
            return Err(BracketError::WinnerNotInMatch {
                match_id,
                winner_id,
            });
        }

        let status = if winner.is_some() {
            MatchStatus::Done
        } else {
            MatchStatus::Pending
        };

        // Credits are decided from the state this update replaced, not from
        // `previous`, which a concurrent submission may have overwritten.
        let ResultUpdate {
            recorded,
            previous_winner,
            previous_status,
        } = self
            .matches
            .update_result(match_id, winner, status)
            .await?
            .ok_or(BracketError::MatchNotFound(match_id))?;

        let max_round = self.matches.max_round(recorded.tournament_id).await?;
        let final_round = max_round == Some(recorded.round);

        let (credited, revoked) = if final_round {
            self.policy
                .credit_changes(previous_status, previous_winner, winner)
        } else {
            (None, None)
        };

        if let Some(participant_id) = revoked {
            let wins = self.participants.adjust_wins(participant_id, -1).await?;
            log::info!(
                "Revoked tournament win from participant {} (match {}), now {}",
                participant_id,
                match_id,
                wins
            );
        }

        if let Some(participant_id) = credited {
            let wins = self.participants.adjust_wins(participant_id, 1).await?;
            log::info!(
                "Credited tournament win to participant {} (match {}), now {}",
                participant_id,
                match_id,
                wins
            );
        }

        log::debug!(
            "Match {} in tournament {} round {} is now {} (winner {:?})",
            match_id,
            recorded.tournament_id,
            recorded.round,
            recorded.status,
            recorded.winner_id
        );

        Ok(RecordedResult {
            recorded,
            final_round,
            credited,
            revoked,
        })
    }
}
