//! Participant registry.
//!
//! Club members are registered with a name, belt rank and optional age and
//! weight. Their cumulative tournament win count is maintained by the
//! bracket result recorder, never by the registry itself.
//!
//! ## Example
//!
//! ```no_run
//! use club_bracket::db::Repositories;
//! use club_bracket::participant::{ParticipantDraft, ParticipantManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repos = Repositories::in_memory();
//!     let participants = ParticipantManager::new(repos.participants.clone());
//!
//!     let ana = participants
//!         .register(&ParticipantDraft::new("Ana", "Silva", "purple").with_age(24))
//!         .await?;
//!     println!("Registered {} with ID {}", ana.full_name(), ana.id);
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{ParticipantError, ParticipantResult};
pub use manager::ParticipantManager;
pub use models::{Participant, ParticipantDraft, ParticipantId};
