//! Club Night Example
//!
//! Registers a handful of members, draws a bracket and records results,
//! all against the in-memory store.

use club_bracket::{
    ParticipantDraft, ParticipantManager, Repositories, TournamentManager, WinCreditPolicy,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Club Night ===\n");

    let repos = Repositories::in_memory();
    let participants = ParticipantManager::new(repos.participants.clone());
    let tournaments = TournamentManager::new(&repos, WinCreditPolicy::default());

    let members = [
        ("Ana", "Silva", "blue"),
        ("Kenji", "Mori", "brown"),
        ("Lea", "Brandt", "purple"),
        ("Omar", "Haddad", "white"),
        ("Iris", "Novak", "blue"),
    ];
    let mut ids = Vec::new();
    for (first, last, belt) in members {
        let p = participants
            .register(&ParticipantDraft::new(first, last, belt))
            .await?;
        println!("Registered #{} {} ({} belt)", p.id, p.full_name(), p.belt);
        ids.push(p.id);
    }

    let bracket = tournaments.create_tournament("Friday Open", &ids).await?;
    let code = bracket.tournament.access_code.as_str().to_string();
    println!(
        "\nTournament '{}' created, access code {}",
        bracket.tournament.name, code
    );

    for m in &bracket.matches {
        let a = m.participant_a.map_or("BYE".to_string(), |id| id.to_string());
        let b = m.participant_b.map_or("BYE".to_string(), |id| id.to_string());
        println!("  Round {} slot {} ({}): #{} vs #{}", m.round, m.slot, m.side.as_str(), a, b);
    }

    // Every round-1 match is in the highest round, so each winner is credited
    println!();
    for m in &bracket.matches {
        let Some(winner) = m.participant_a else {
            continue;
        };
        let outcome = tournaments
            .record_result(bracket.tournament.id, m.id, Some(winner), &code)
            .await?;
        println!(
            "Match {} won by #{} (final round: {}, credited: {:?})",
            m.id, winner, outcome.final_round, outcome.credited
        );
    }

    println!("\nStandings:");
    for p in participants.list().await? {
        println!("  {:<14} {} win(s)", p.full_name(), p.wins);
    }

    Ok(())
}
