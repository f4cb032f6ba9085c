//! Single-elimination bracket: round-1 draw and result recording.
//!
//! This module provides:
//! - [`BracketInitializer`]: shuffles the selected participants and stores
//!   their round-1 pairings, giving a bye to an odd participant out
//! - [`ResultRecorder`]: sets or clears a match winner and credits a
//!   tournament win when the match is in the highest round present
//!
//! Later rounds are never generated here. The "final" round is whatever the
//! highest round number in the store is when a result is recorded.

pub mod errors;
pub mod initializer;
pub mod models;
pub mod recorder;

pub use errors::{BracketError, BracketResult};
pub use initializer::{BracketInitializer, draw_round_one, pair_round_one};
pub use models::{BracketSide, Match, MatchId, MatchStatus, NewMatch, ResultUpdate};
pub use recorder::{RecordedResult, ResultRecorder, WinCreditPolicy};
