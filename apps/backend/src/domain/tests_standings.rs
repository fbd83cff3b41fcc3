use std::collections::BTreeMap;

use crate::domain::score::MatchScore;
use crate::domain::standings::{
    compute_group_table, rank_third_placed, GroupResult, GroupTeam, TableRow,
};

fn team(id: i64, code: &str) -> GroupTeam {
    GroupTeam {
        team_id: id,
        code: code.to_string(),
    }
}

fn game(home: i64, away: i64, h: i32, a: i32) -> GroupResult {
    GroupResult {
        home_team_id: home,
        away_team_id: away,
        score: MatchScore::new(h, a).unwrap(),
    }
}

fn codes(table: &[TableRow]) -> Vec<&str> {
    table.iter().map(|r| r.code.as_str()).collect()
}

fn group_a() -> Vec<GroupTeam> {
    vec![team(1, "MEX"), team(2, "RSA"), team(3, "KOR"), team(4, "CZE")]
}

#[test]
fn empty_group_sorts_by_code() {
    let table = compute_group_table(&group_a(), &[]);
    assert_eq!(codes(&table), vec!["CZE", "KOR", "MEX", "RSA"]);
    assert!(table.iter().all(|r| r.played == 0 && r.points == 0));
}

#[test]
fn full_group_orders_by_points_then_gd() {
    let results = vec![
        game(1, 2, 2, 0), // MEX beat RSA
        game(3, 4, 1, 1),
        game(1, 3, 1, 0), // MEX beat KOR
        game(4, 2, 3, 0), // CZE beat RSA
        game(4, 1, 0, 0),
        game(2, 3, 1, 2), // KOR beat RSA
    ];
    let table = compute_group_table(&group_a(), &results);
    assert_eq!(codes(&table), vec!["MEX", "CZE", "KOR", "RSA"]);

    let mex = &table[0];
    assert_eq!((mex.played, mex.won, mex.drawn, mex.lost), (3, 2, 1, 0));
    assert_eq!((mex.goals_for, mex.goals_against, mex.goal_difference), (3, 0, 3));
    assert_eq!(mex.points, 7);

    // CZE 5 pts GD +3, KOR 4 pts
    assert_eq!(table[1].points, 5);
    assert_eq!(table[2].points, 4);
    assert_eq!(table[3].points, 0);
}

#[test]
fn head_to_head_breaks_tie_on_overall_merit() {
    // MEX and KOR both finish on 6 pts, GD +2, GF 4; KOR won the direct game.
    let results = vec![
        game(3, 1, 1, 0), // KOR beat MEX
        game(1, 2, 2, 0),
        game(1, 4, 2, 1),
        game(3, 2, 0, 1),
        game(3, 4, 3, 1),
        game(2, 4, 0, 0),
    ];
    let table = compute_group_table(&group_a(), &results);
    let mex = table.iter().find(|r| r.code == "MEX").unwrap();
    let kor = table.iter().find(|r| r.code == "KOR").unwrap();
    assert_eq!(mex.points, kor.points);
    assert_eq!(mex.goal_difference, kor.goal_difference);
    assert_eq!(mex.goals_for, kor.goals_for);
    assert_eq!(codes(&table)[..2], ["KOR", "MEX"]);
}

#[test]
fn code_is_last_resort() {
    // Two teams drew with each other and are otherwise identical.
    let teams = vec![team(10, "URU"), team(11, "ARG")];
    let table = compute_group_table(&teams, &[game(10, 11, 1, 1)]);
    assert_eq!(codes(&table), vec!["ARG", "URU"]);
}

#[test]
fn results_with_foreign_teams_are_ignored() {
    let table = compute_group_table(&group_a(), &[game(1, 99, 5, 0)]);
    assert!(table.iter().all(|r| r.played == 0));
}

#[test]
fn thirds_ranked_across_groups() {
    let row = |code: &str, points: u32, gd: i32, gf: u32| TableRow {
        team_id: 0,
        code: code.to_string(),
        played: 3,
        won: 0,
        drawn: 0,
        lost: 0,
        goals_for: gf,
        goals_against: 0,
        goal_difference: gd,
        points,
    };
    let filler = || row("X", 9, 9, 9);
    let mut tables = BTreeMap::new();
    tables.insert('A', vec![filler(), filler(), row("A3", 4, 0, 3)]);
    tables.insert('B', vec![filler(), filler(), row("B3", 4, 1, 2)]);
    tables.insert('C', vec![filler(), filler(), row("C3", 3, 2, 5)]);
    tables.insert('D', vec![filler(), filler(), row("D3", 4, 0, 3)]);
    tables.insert('E', vec![filler(), filler()]);

    let ranked = rank_third_placed(&tables);
    let order: Vec<char> = ranked.iter().map(|t| t.group).collect();
    assert_eq!(order, vec!['B', 'A', 'D', 'C']);
}
