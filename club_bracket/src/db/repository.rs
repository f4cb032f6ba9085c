//! Repository trait definitions for testability and dependency injection.
//!
//! The bracket logic only needs three things from the row store: insert
//! match rows, update one match row by ID, and adjust a participant's win
//! counter. Those plus the supporting reads are expressed here as traits,
//! with PostgreSQL implementations below and an in-memory one in
//! [`super::memory`].

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::bracket::{
    BracketError, BracketResult, BracketSide, Match, MatchId, MatchStatus, NewMatch,
    ResultUpdate,
};
use crate::participant::{
    Participant, ParticipantDraft, ParticipantError, ParticipantId, ParticipantResult,
};
use crate::security::AccessCode;
use crate::tournament::{Tournament, TournamentId};

/// Trait for participant repository operations
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Insert a participant with zero wins
    async fn create_participant(&self, draft: &ParticipantDraft)
    -> ParticipantResult<Participant>;

    /// Find participant by ID
    async fn find_participant(&self, id: ParticipantId) -> ParticipantResult<Option<Participant>>;

    /// All participants, most wins first, then by last and first name
    async fn list_participants(&self) -> ParticipantResult<Vec<Participant>>;

    /// Replace descriptive fields. `None` if the participant does not exist.
    async fn update_participant(
        &self,
        id: ParticipantId,
        draft: &ParticipantDraft,
    ) -> ParticipantResult<Option<Participant>>;

    /// Delete participant. Returns whether a row was removed.
    async fn delete_participant(&self, id: ParticipantId) -> ParticipantResult<bool>;

    /// Add `delta` to the win counter, never going below zero.
    /// Returns the new count.
    async fn adjust_wins(&self, id: ParticipantId, delta: i32) -> ParticipantResult<i32>;
}

/// Trait for tournament repository operations
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Insert a tournament
    async fn create_tournament(
        &self,
        name: &str,
        access_code: &AccessCode,
    ) -> BracketResult<Tournament>;

    /// Find tournament by ID
    async fn find_tournament(&self, id: TournamentId) -> BracketResult<Option<Tournament>>;

    /// All tournaments, newest first
    async fn list_tournaments(&self) -> BracketResult<Vec<Tournament>>;

    /// Check that the store is reachable
    async fn health_check(&self) -> BracketResult<()>;
}

/// Trait for match repository operations
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Bulk insert. Returned rows are ordered by round, then slot.
    async fn insert_matches(&self, matches: &[NewMatch]) -> BracketResult<Vec<Match>>;

    /// Find match by ID
    async fn find_match(&self, id: MatchId) -> BracketResult<Option<Match>>;

    /// All matches of a tournament, ordered by round, then slot
    async fn list_by_tournament(&self, tournament_id: TournamentId) -> BracketResult<Vec<Match>>;

    /// Set winner and status, returning the stored row together with the
    /// winner and status it replaced. The swap is atomic: concurrent updates
    /// of the same match each see the other's result as the previous one.
    /// `None` if the match does not exist.
    async fn update_result(
        &self,
        id: MatchId,
        winner: Option<ParticipantId>,
        status: MatchStatus,
    ) -> BracketResult<Option<ResultUpdate>>;

    /// Highest round number among the tournament's matches
    async fn max_round(&self, tournament_id: TournamentId) -> BracketResult<Option<i32>>;
}

const PARTICIPANT_COLUMNS: &str =
    "id, first_name, last_name, belt, age, weight_kg, wins, created_at";

const TOURNAMENT_COLUMNS: &str = "id, name, access_code, created_at";

const MATCH_COLUMNS: &str = "id, tournament_id, round, slot, participant_a, participant_b, \
                             side, status, winner_id, created_at";

fn participant_from_row(r: &PgRow) -> Participant {
    Participant {
        id: r.get("id"),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        belt: r.get("belt"),
        age: r.get("age"),
        weight_kg: r.get("weight_kg"),
        wins: r.get("wins"),
        created_at: r.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
    }
}

fn tournament_from_row(r: &PgRow) -> Tournament {
    Tournament {
        id: r.get("id"),
        name: r.get("name"),
        access_code: AccessCode::from_stored(r.get::<String, _>("access_code")),
        created_at: r.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
    }
}

fn match_from_row(r: &PgRow) -> BracketResult<Match> {
    let side: String = r.get("side");
    let status: String = r.get("status");

    Ok(Match {
        id: r.get("id"),
        tournament_id: r.get("tournament_id"),
        round: r.get("round"),
        slot: r.get("slot"),
        participant_a: r.get("participant_a"),
        participant_b: r.get("participant_b"),
        side: BracketSide::parse(&side)
            .ok_or_else(|| BracketError::InvalidRow(format!("match side '{side}'")))?,
        status: MatchStatus::parse(&status)
            .ok_or_else(|| BracketError::InvalidRow(format!("match status '{status}'")))?,
        winner_id: r.get("winner_id"),
        created_at: r.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
    })
}

/// PostgreSQL implementation of `ParticipantRepository`
pub struct PgParticipantRepository {
    pool: PgPool,
}

impl PgParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    async fn create_participant(
        &self,
        draft: &ParticipantDraft,
    ) -> ParticipantResult<Participant> {
        let row = sqlx::query(&format!(
            "INSERT INTO participants (first_name, last_name, belt, age, weight_kg)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.belt)
        .bind(draft.age)
        .bind(draft.weight_kg)
        .fetch_one(&self.pool)
        .await?;

        Ok(participant_from_row(&row))
    }

    async fn find_participant(&self, id: ParticipantId) -> ParticipantResult<Option<Participant>> {
        let row = sqlx::query(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(participant_from_row))
    }

    async fn list_participants(&self) -> ParticipantResult<Vec<Participant>> {
        let rows = sqlx::query(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants
             ORDER BY wins DESC, last_name, first_name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(participant_from_row).collect())
    }

    async fn update_participant(
        &self,
        id: ParticipantId,
        draft: &ParticipantDraft,
    ) -> ParticipantResult<Option<Participant>> {
        let row = sqlx::query(&format!(
            "UPDATE participants
             SET first_name = $1, last_name = $2, belt = $3, age = $4, weight_kg = $5
             WHERE id = $6
             RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.belt)
        .bind(draft.age)
        .bind(draft.weight_kg)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(participant_from_row))
    }

    async fn delete_participant(&self, id: ParticipantId) -> ParticipantResult<bool> {
        let result = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn adjust_wins(&self, id: ParticipantId, delta: i32) -> ParticipantResult<i32> {
        // Single statement, so concurrent credits cannot lose an update
        let row = sqlx::query(
            "UPDATE participants SET wins = GREATEST(wins + $1, 0) WHERE id = $2 RETURNING wins",
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ParticipantError::NotFound(id))?;

        Ok(row.get("wins"))
    }
}

/// PostgreSQL implementation of `TournamentRepository`
pub struct PgTournamentRepository {
    pool: PgPool,
}

impl PgTournamentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TournamentRepository for PgTournamentRepository {
    async fn create_tournament(
        &self,
        name: &str,
        access_code: &AccessCode,
    ) -> BracketResult<Tournament> {
        let row = sqlx::query(&format!(
            "INSERT INTO tournaments (name, access_code) VALUES ($1, $2)
             RETURNING {TOURNAMENT_COLUMNS}"
        ))
        .bind(name)
        .bind(access_code.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(tournament_from_row(&row))
    }

    async fn find_tournament(&self, id: TournamentId) -> BracketResult<Option<Tournament>> {
        let row = sqlx::query(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(tournament_from_row))
    }

    async fn list_tournaments(&self) -> BracketResult<Vec<Tournament>> {
        let rows = sqlx::query(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(tournament_from_row).collect())
    }

    async fn health_check(&self) -> BracketResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// PostgreSQL implementation of `MatchRepository`
pub struct PgMatchRepository {
    pool: PgPool,
}

impl PgMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRepository for PgMatchRepository {
    async fn insert_matches(&self, matches: &[NewMatch]) -> BracketResult<Vec<Match>> {
        if matches.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO matches (tournament_id, round, slot, participant_a, participant_b, side, status) ",
        );
        builder.push_values(matches, |mut b, m| {
            b.push_bind(m.tournament_id)
                .push_bind(m.round)
                .push_bind(m.slot)
                .push_bind(m.participant_a)
                .push_bind(m.participant_b)
                .push_bind(m.side.as_str())
                .push_bind(m.status.as_str());
        });
        builder.push(" RETURNING ");
        builder.push(MATCH_COLUMNS);

        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut inserted = rows
            .iter()
            .map(match_from_row)
            .collect::<BracketResult<Vec<_>>>()?;
        inserted.sort_by_key(|m| (m.round, m.slot));
        Ok(inserted)
    }

    async fn find_match(&self, id: MatchId) -> BracketResult<Option<Match>> {
        let row = sqlx::query(&format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(match_from_row).transpose()
    }

    async fn list_by_tournament(&self, tournament_id: TournamentId) -> BracketResult<Vec<Match>> {
        let rows = sqlx::query(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE tournament_id = $1 ORDER BY round, slot"
        ))
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(match_from_row).collect()
    }

    async fn update_result(
        &self,
        id: MatchId,
        winner: Option<ParticipantId>,
        status: MatchStatus,
    ) -> BracketResult<Option<ResultUpdate>> {
        // The row lock makes a concurrent update wait, then see this one's
        // winner as its previous winner.
        let row = sqlx::query(&format!(
            "UPDATE matches SET winner_id = $1, status = $2
             FROM (SELECT id AS locked_id, winner_id AS prev_winner, status AS prev_status
                   FROM matches WHERE id = $3 FOR UPDATE) prev
             WHERE matches.id = prev.locked_id
             RETURNING prev.prev_winner, prev.prev_status, {MATCH_COLUMNS}"
        ))
        .bind(winner)
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let prev_status: String = row.get("prev_status");
        Ok(Some(ResultUpdate {
            recorded: match_from_row(&row)?,
            previous_winner: row.get("prev_winner"),
            previous_status: MatchStatus::parse(&prev_status).ok_or_else(|| {
                BracketError::InvalidRow(format!("match status '{prev_status}'"))
            })?,
        }))
    }

    async fn max_round(&self, tournament_id: TournamentId) -> BracketResult<Option<i32>> {
        let row = sqlx::query("SELECT MAX(round) AS max_round FROM matches WHERE tournament_id = $1")
            .bind(tournament_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("max_round"))
    }
}
