use solverforge_core::{ConstraintRef, HardSoftScore};
use solverforge_test::roster::{Roster, Shift};

use super::{constraint, matched_ids, overlapping, session_of, unassigned, RosterSession};

fn roster_with_conflict() -> RosterSession {
    let mut session = session_of(vec![overlapping(), unassigned()]);
    session
        .insert(Roster::shift(Shift::new(1, Some(1)).at(0, 8)))
        .unwrap();
    session
        .insert(Roster::shift(Shift::new(2, Some(1)).at(6, 14)))
        .unwrap();
    session.insert(Roster::shift(Shift::new(3, None))).unwrap();
    session
        .insert(Roster::shift(Shift::new(4, Some(2)).at(0, 8)))
        .unwrap();
    session
}

#[test]
fn test_constraint_matches() {
    let session = roster_with_conflict();
    assert_eq!(
        matched_ids(&session, "Overlapping shifts"),
        vec![vec![Roster::shift_id(1), Roster::shift_id(2)]]
    );

    let matches = session
        .constraint_matches(&constraint("Unassigned shift"))
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].score, HardSoftScore::of_soft(-1));

    assert!(session
        .constraint_matches(&ConstraintRef::new("roster", "Missing"))
        .is_none());
}

#[test]
fn test_explain_breaks_down_score() {
    let session = roster_with_conflict();
    let explanation = session.explain();

    assert_eq!(explanation.score, HardSoftScore::of(-1, -1));
    assert_eq!(explanation.total_match_count(), 2);
    assert_eq!(explanation.constraint_analyses.len(), 2);
    assert_eq!(explanation.all_matches().len(), 2);

    let overlapping = &explanation.constraint_analyses[0];
    assert_eq!(overlapping.result.name(), "Overlapping shifts");
    assert!(overlapping.result.is_hard);
    assert_eq!(overlapping.result.score, HardSoftScore::of_hard(-1));
    assert_eq!(overlapping.matches.len(), 1);

    let unassigned = &explanation.constraint_analyses[1];
    assert!(!unassigned.result.is_hard);

    let non_zero: Vec<&str> = explanation
        .non_zero_constraints()
        .iter()
        .map(|a| a.result.name())
        .collect();
    assert_eq!(non_zero, vec!["Overlapping shifts", "Unassigned shift"]);
}

#[test]
fn test_indictments_charge_each_fact() {
    let mut session = roster_with_conflict();
    let indictments = session.indictments();

    assert_eq!(indictments.len(), 3);
    for id in [1, 2] {
        let indictment = &indictments[&Roster::shift_id(id)];
        assert_eq!(indictment.match_count(), 1);
        assert_eq!(indictment.constraint_count(), 1);
        assert_eq!(indictment.score, HardSoftScore::of_hard(-1));
    }
    assert_eq!(
        indictments[&Roster::shift_id(3)].score,
        HardSoftScore::of_soft(-1)
    );
    assert!(!indictments.contains_key(&Roster::shift_id(4)));

    // resolving the conflict clears both indictments
    session
        .update(Roster::shift(Shift::new(2, Some(1)).at(8, 16)))
        .unwrap();
    let indictments = session.indictments();
    assert_eq!(indictments.len(), 1);
    assert!(indictments.contains_key(&Roster::shift_id(3)));
}
