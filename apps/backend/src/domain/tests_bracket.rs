use std::collections::BTreeMap;

use crate::domain::bracket::{resolve, BracketInput, GroupInput, KnockoutFixture, SlotResolution};
use crate::domain::score::{MatchResult, MatchScore, Side};
use crate::domain::stage::Stage;
use crate::domain::standings::{GroupResult, GroupTeam};

fn score(h: i32, a: i32) -> MatchScore {
    MatchScore::new(h, a).unwrap()
}

fn result(h: i32, a: i32, pens: Option<Side>) -> Option<MatchResult> {
    Some(MatchResult::new(score(h, a), pens, Stage::RoundOf16).unwrap())
}

/// Three-team group: team 1 beats both, team 2 beats team 3 by `second_over_third`.
fn group(letter: char, base: i64, second_over_third: (i32, i32)) -> GroupInput {
    let teams = (1..=3)
        .map(|n| GroupTeam {
            team_id: base + n,
            code: format!("{letter}{n}"),
        })
        .collect();
    let results = vec![
        GroupResult {
            home_team_id: base + 1,
            away_team_id: base + 2,
            score: score(1, 0),
        },
        GroupResult {
            home_team_id: base + 1,
            away_team_id: base + 3,
            score: score(1, 0),
        },
        GroupResult {
            home_team_id: base + 2,
            away_team_id: base + 3,
            score: score(second_over_third.0, second_over_third.1),
        },
    ];
    GroupInput {
        teams,
        results,
        expected_matches: 3,
    }
}

fn fixture(no: i32, stage: Stage, home: &str, away: &str) -> KnockoutFixture {
    KnockoutFixture {
        match_no: no,
        stage,
        home_slot: home.parse().unwrap(),
        away_slot: away.parse().unwrap(),
        result: None,
    }
}

fn team_at(res: &[SlotResolution], match_no: i32, side: Side) -> Option<i64> {
    res.iter()
        .find(|r| r.match_no == match_no && r.side == side)
        .and_then(|r| r.team_id)
}

/// Groups A (ids 11..13), B (21..23), C (31..33).
/// Third-placed ranking: B3 (GD -2), C3 (GD -3), A3 (GD -4).
fn three_groups() -> BTreeMap<char, GroupInput> {
    let mut groups = BTreeMap::new();
    groups.insert('A', group('A', 10, (3, 0)));
    groups.insert('B', group('B', 20, (2, 1)));
    groups.insert('C', group('C', 30, (2, 0)));
    groups
}

#[test]
fn group_slots_resolve_when_group_complete() {
    let input = BracketInput {
        groups: three_groups(),
        knockouts: vec![fixture(10, Stage::QuarterFinal, "1A", "2B")],
    };
    let res = resolve(&input);
    assert_eq!(team_at(&res, 10, Side::Home), Some(11));
    assert_eq!(team_at(&res, 10, Side::Away), Some(22));
}

#[test]
fn incomplete_group_leaves_slot_open() {
    let mut groups = three_groups();
    if let Some(a) = groups.get_mut(&'A') {
        a.results.pop();
    }
    let input = BracketInput {
        groups,
        knockouts: vec![fixture(10, Stage::QuarterFinal, "1A", "1B")],
    };
    let res = resolve(&input);
    assert_eq!(team_at(&res, 10, Side::Home), None);
    assert_eq!(team_at(&res, 10, Side::Away), Some(21));
}

#[test]
fn best_thirds_fill_listed_groups() {
    let input = BracketInput {
        groups: three_groups(),
        knockouts: vec![
            fixture(10, Stage::QuarterFinal, "1A", "3BC"),
            fixture(11, Stage::QuarterFinal, "1B", "3AC"),
        ],
    };
    let res = resolve(&input);
    // Top two thirds are B3 and C3.
    assert_eq!(team_at(&res, 10, Side::Away), Some(23));
    assert_eq!(team_at(&res, 11, Side::Away), Some(33));
}

#[test]
fn best_thirds_backtrack_when_greedy_choice_blocks() {
    let input = BracketInput {
        groups: three_groups(),
        knockouts: vec![
            fixture(10, Stage::QuarterFinal, "1A", "3BC"),
            fixture(11, Stage::QuarterFinal, "1C", "3B"),
        ],
    };
    let res = resolve(&input);
    assert_eq!(team_at(&res, 10, Side::Away), Some(33));
    assert_eq!(team_at(&res, 11, Side::Away), Some(23));
}

#[test]
fn impossible_third_assignment_stays_unresolved() {
    let input = BracketInput {
        groups: three_groups(),
        knockouts: vec![
            fixture(10, Stage::QuarterFinal, "1B", "3A"),
            fixture(11, Stage::QuarterFinal, "1C", "3A"),
        ],
    };
    let res = resolve(&input);
    assert_eq!(team_at(&res, 10, Side::Away), None);
    assert_eq!(team_at(&res, 11, Side::Away), None);
    // Group slots are unaffected.
    assert_eq!(team_at(&res, 10, Side::Home), Some(21));
}

#[test]
fn thirds_wait_for_every_group() {
    let mut groups = three_groups();
    if let Some(c) = groups.get_mut(&'C') {
        c.results.pop();
    }
    let input = BracketInput {
        groups,
        knockouts: vec![fixture(10, Stage::QuarterFinal, "1A", "3BC")],
    };
    let res = resolve(&input);
    assert_eq!(team_at(&res, 10, Side::Home), Some(11));
    assert_eq!(team_at(&res, 10, Side::Away), None);
}

fn four_team_bracket() -> BracketInput {
    BracketInput {
        groups: three_groups(),
        knockouts: vec![
            fixture(20, Stage::SemiFinal, "1A", "2B"),
            fixture(21, Stage::SemiFinal, "1B", "2C"),
            fixture(22, Stage::ThirdPlace, "L20", "L21"),
            fixture(23, Stage::Final, "W20", "W21"),
        ],
    }
}

#[test]
fn winners_and_losers_advance() {
    let mut input = four_team_bracket();
    input.knockouts[0].result = result(2, 1, None); // 11 beats 22
    input.knockouts[1].result = result(0, 0, Some(Side::Away)); // 32 wins on pens over 21

    let res = resolve(&input);
    assert_eq!(team_at(&res, 23, Side::Home), Some(11));
    assert_eq!(team_at(&res, 23, Side::Away), Some(32));
    assert_eq!(team_at(&res, 22, Side::Home), Some(22));
    assert_eq!(team_at(&res, 22, Side::Away), Some(21));
}

#[test]
fn downstream_waits_for_result() {
    let mut input = four_team_bracket();
    input.knockouts[0].result = result(2, 1, None);

    let res = resolve(&input);
    assert_eq!(team_at(&res, 23, Side::Home), Some(11));
    assert_eq!(team_at(&res, 23, Side::Away), None);
    assert_eq!(team_at(&res, 22, Side::Away), None);
}

#[test]
fn corrected_result_re_resolves_downstream() {
    let mut input = four_team_bracket();
    input.knockouts[0].result = result(2, 1, None);
    let first = resolve(&input);
    assert_eq!(team_at(&first, 23, Side::Home), Some(11));

    input.knockouts[0].result = result(1, 2, None);
    let second = resolve(&input);
    assert_eq!(team_at(&second, 23, Side::Home), Some(22));
    assert_eq!(team_at(&second, 22, Side::Home), Some(11));

    input.knockouts[0].result = None;
    let cleared = resolve(&input);
    assert_eq!(team_at(&cleared, 23, Side::Home), None);
    assert_eq!(team_at(&cleared, 22, Side::Home), None);
}

#[test]
fn result_on_unresolved_match_does_not_leak() {
    let mut input = four_team_bracket();
    if let Some(a) = input.groups.get_mut(&'A') {
        a.results.clear();
    }
    // Result entered while the home side is still unknown.
    input.knockouts[0].result = result(3, 0, None);
    let res = resolve(&input);
    assert_eq!(team_at(&res, 20, Side::Home), None);
    assert_eq!(team_at(&res, 23, Side::Home), None);
}

#[test]
fn resolve_is_idempotent_and_ordered() {
    let mut input = four_team_bracket();
    input.knockouts.reverse();
    input.knockouts[3].result = result(2, 1, None);
    let a = resolve(&input);
    let b = resolve(&input);
    assert_eq!(a, b);
    let order: Vec<(i32, Side)> = a.iter().map(|r| (r.match_no, r.side)).collect();
    assert_eq!(
        order,
        vec![
            (20, Side::Home),
            (20, Side::Away),
            (21, Side::Home),
            (21, Side::Away),
            (22, Side::Home),
            (22, Side::Away),
            (23, Side::Home),
            (23, Side::Away),
        ]
    );
}
