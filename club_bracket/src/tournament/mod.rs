//! Tournament module for single-elimination club tournaments.
//!
//! This module provides tournament management functionality including:
//! - Tournament creation with a random six-character access code
//! - Round-1 bracket drawing from a participant selection
//! - Access-code gated result recording
//! - Bracket retrieval for display
//!
//! ## Example
//!
//! ```no_run
//! use club_bracket::bracket::WinCreditPolicy;
//! use club_bracket::db::{Database, Repositories};
//! use club_bracket::tournament::TournamentManager;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let repos = Repositories::postgres(db.pool().clone());
//!     let tournaments = TournamentManager::new(&repos, WinCreditPolicy::default());
//!
//!     let bracket = tournaments.create_tournament("Spring Open", &[1, 2, 3]).await?;
//!     println!(
//!         "Created tournament {} with {} matches, code {}",
//!         bracket.tournament.id,
//!         bracket.matches.len(),
//!         bracket.tournament.access_code.as_str()
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;

pub use manager::TournamentManager;
pub use models::{Tournament, TournamentBracket, TournamentId};
