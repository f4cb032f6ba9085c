//! End-to-end tournament scenarios over the in-memory store.
//!
//! Drives the public managers the way the server does: register members,
//! draw a bracket, then record and reset results with the access code.

use club_bracket::{
    BracketError, MatchStatus, ParticipantDraft, ParticipantId, ParticipantManager,
    Repositories, TournamentManager, WinCreditPolicy,
};

struct Club {
    participants: ParticipantManager,
    tournaments: TournamentManager,
}

fn club(policy: WinCreditPolicy) -> Club {
    let repos = Repositories::in_memory();
    Club {
        participants: ParticipantManager::new(repos.participants.clone()),
        tournaments: TournamentManager::new(&repos, policy),
    }
}

async fn register_all(club: &Club, names: &[&str]) -> Vec<ParticipantId> {
    let mut ids = Vec::new();
    for name in names {
        let p = club
            .participants
            .register(&ParticipantDraft::new(*name, "Member", "yellow"))
            .await
            .unwrap();
        ids.push(p.id);
    }
    ids
}

async fn wins(club: &Club, id: ParticipantId) -> i32 {
    club.participants.get(id).await.unwrap().wins
}

#[tokio::test]
async fn test_three_participants_get_two_matches_and_one_bye() {
    let club = club(WinCreditPolicy::Reconciled);
    let ids = register_all(&club, &["A", "B", "C"]).await;

    let bracket = club.tournaments.create_tournament("Trio", &ids).await.unwrap();

    assert_eq!(bracket.matches.len(), 2);
    assert_eq!(bracket.matches.iter().filter(|m| m.is_bye()).count(), 1);
    let mut placed: Vec<_> = bracket.matches.iter().flat_map(|m| m.participants()).collect();
    placed.sort();
    assert_eq!(placed, ids);
}

#[tokio::test]
async fn test_repeated_draws_vary() {
    let club = club(WinCreditPolicy::Reconciled);
    let ids = register_all(&club, &["A", "B", "C"]).await;

    let first = club.tournaments.create_tournament("Draw 0", &ids).await.unwrap();
    let mut varied = false;
    for i in 1..30 {
        let next = club
            .tournaments
            .create_tournament(&format!("Draw {i}"), &ids)
            .await
            .unwrap();
        let pairs = |b: &club_bracket::TournamentBracket| {
            b.matches
                .iter()
                .map(|m| (m.participant_a, m.participant_b))
                .collect::<Vec<_>>()
        };
        if pairs(&next) != pairs(&first) {
            varied = true;
            break;
        }
    }
    assert!(varied, "Draws should be randomized");
}

#[tokio::test]
async fn test_single_match_record_reset_record() {
    for (policy, expected) in [
        (WinCreditPolicy::Legacy, 2),
        (WinCreditPolicy::Reconciled, 1),
    ] {
        let club = club(policy);
        let ids = register_all(&club, &["A", "B"]).await;
        let bracket = club.tournaments.create_tournament("Final", &ids).await.unwrap();
        let tid = bracket.tournament.id;
        let code = bracket.tournament.access_code.as_str().to_string();
        let m = &bracket.matches[0];
        let a = m.participant_a.unwrap();

        club.tournaments.record_result(tid, m.id, Some(a), &code).await.unwrap();
        club.tournaments.record_result(tid, m.id, None, &code).await.unwrap();
        club.tournaments.record_result(tid, m.id, Some(a), &code).await.unwrap();

        assert_eq!(wins(&club, a).await, expected, "policy {policy}");
    }
}

#[tokio::test]
async fn test_changing_the_winner_moves_the_credit() {
    let club = club(WinCreditPolicy::Reconciled);
    let ids = register_all(&club, &["A", "B"]).await;
    let bracket = club.tournaments.create_tournament("Final", &ids).await.unwrap();
    let code = bracket.tournament.access_code.as_str().to_string();
    let m = &bracket.matches[0];
    let (a, b) = (m.participant_a.unwrap(), m.participant_b.unwrap());

    club.tournaments
        .record_result(bracket.tournament.id, m.id, Some(a), &code)
        .await
        .unwrap();
    let outcome = club
        .tournaments
        .record_result(bracket.tournament.id, m.id, Some(b), &code)
        .await
        .unwrap();

    assert_eq!(outcome.credited, Some(b));
    assert_eq!(outcome.revoked, Some(a));
    assert_eq!(wins(&club, a).await, 0);
    assert_eq!(wins(&club, b).await, 1);

    let view = club.tournaments.get_bracket(bracket.tournament.id).await.unwrap();
    assert_eq!(view.champion(), Some(b));
}

#[tokio::test]
async fn test_wrong_code_writes_nothing() {
    let club = club(WinCreditPolicy::Reconciled);
    let ids = register_all(&club, &["A", "B"]).await;
    let bracket = club.tournaments.create_tournament("Final", &ids).await.unwrap();
    let m = &bracket.matches[0];

    let err = club
        .tournaments
        .record_result(bracket.tournament.id, m.id, m.participant_a, "000000")
        .await
        .unwrap_err();
    assert!(matches!(err, BracketError::AccessDenied(_)));

    let view = club.tournaments.get_bracket(bracket.tournament.id).await.unwrap();
    assert_eq!(view.matches[0].status, MatchStatus::Pending);
    for id in ids {
        assert_eq!(wins(&club, id).await, 0);
    }
}

#[tokio::test]
async fn test_deleted_participant_leaves_empty_slot() {
    let club = club(WinCreditPolicy::Reconciled);
    let ids = register_all(&club, &["A", "B"]).await;
    let bracket = club.tournaments.create_tournament("Final", &ids).await.unwrap();

    club.participants.remove(ids[0]).await.unwrap();

    let view = club.tournaments.get_bracket(bracket.tournament.id).await.unwrap();
    assert_eq!(view.matches.len(), 1);
    assert!(view.matches[0].is_bye());
    assert!(!view.matches[0].has_participant(ids[0]));
}
