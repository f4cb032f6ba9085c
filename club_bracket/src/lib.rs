//! # Club Bracket
//!
//! Single-elimination tournament brackets for a martial-arts club.
//!
//! Club members are registered as participants. A tournament is created from
//! a selection of participants: the selection is shuffled, paired off into
//! round-1 matches (an odd participant out gets a bye) and the match rows
//! are stored. Results are then recorded per match, gated by the
//! tournament's six-character access code. A win in the tournament's highest
//! round credits the winner's `wins` counter.
//!
//! ## Core Modules
//!
//! - [`participant`]: Club members and their win counters
//! - [`tournament`]: Tournament creation, access codes and bracket views
//! - [`bracket`]: Round-1 draw and result recording
//! - [`db`]: PostgreSQL pool, repositories and an in-memory store
//! - [`security`]: Access code generation and constant-time comparison
//!
//! ## Example
//!
//! ```
//! use club_bracket::{
//!     ParticipantDraft, ParticipantManager, Repositories, TournamentManager, WinCreditPolicy,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let repos = Repositories::in_memory();
//! let participants = ParticipantManager::new(repos.participants.clone());
//! let tournaments = TournamentManager::new(&repos, WinCreditPolicy::default());
//!
//! let ana = participants.register(&ParticipantDraft::new("Ana", "Silva", "blue")).await.unwrap();
//! let ken = participants.register(&ParticipantDraft::new("Ken", "Mori", "blue")).await.unwrap();
//!
//! let bracket = tournaments.create_tournament("Friday Cup", &[ana.id, ken.id]).await.unwrap();
//! assert_eq!(bracket.matches.len(), 1);
//! # });
//! ```

/// Round-1 draw, match models and result recording.
pub mod bracket;
pub use bracket::{
    BracketError, BracketInitializer, BracketResult, Match, MatchId, MatchStatus, RecordedResult,
    ResultRecorder, WinCreditPolicy,
};

/// Connection pool, repositories and the in-memory store.
pub mod db;
pub use db::{Database, DatabaseConfig, MemoryStore, Repositories};

/// Club members.
pub mod participant;
pub use participant::{
    Participant, ParticipantDraft, ParticipantError, ParticipantId, ParticipantManager,
};

/// Access codes.
pub mod security;

/// Tournaments and bracket views.
pub mod tournament;
pub use tournament::{Tournament, TournamentBracket, TournamentId, TournamentManager};
