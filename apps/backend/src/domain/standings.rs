//! Group tables and the ranking of third-placed teams.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::score::MatchScore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTeam {
    pub team_id: i64,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupResult {
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub score: MatchScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub team_id: i64,
    pub code: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl TableRow {
    fn new(team: &GroupTeam) -> Self {
        Self {
            team_id: team.team_id,
            code: team.code.clone(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    fn record(&mut self, scored: u8, conceded: u8) {
        self.played += 1;
        self.goals_for += u32::from(scored);
        self.goals_against += u32::from(conceded);
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.won += 1;
                self.points += 3;
            }
            Ordering::Equal => {
                self.drawn += 1;
                self.points += 1;
            }
            Ordering::Less => self.lost += 1,
        }
    }

    /// Points, goal difference, goals for. Higher is better.
    fn merit(&self) -> (u32, i32, u32) {
        (self.points, self.goal_difference, self.goals_for)
    }
}

fn tally<'a>(
    teams: impl Iterator<Item = &'a GroupTeam>,
    results: impl Iterator<Item = &'a GroupResult>,
) -> HashMap<i64, TableRow> {
    let mut rows: HashMap<i64, TableRow> = teams.map(|t| (t.team_id, TableRow::new(t))).collect();
    for r in results {
        if !rows.contains_key(&r.home_team_id) || !rows.contains_key(&r.away_team_id) {
            continue;
        }
        if let Some(home) = rows.get_mut(&r.home_team_id) {
            home.record(r.score.home, r.score.away);
        }
        if let Some(away) = rows.get_mut(&r.away_team_id) {
            away.record(r.score.away, r.score.home);
        }
    }
    rows
}

/// Build the ordered table for one group.
///
/// Results involving a team outside `teams` are ignored.
pub fn compute_group_table(teams: &[GroupTeam], results: &[GroupResult]) -> Vec<TableRow> {
    let rows = tally(teams.iter(), results.iter());
    let mut table: Vec<TableRow> = teams
        .iter()
        .filter_map(|t| rows.get(&t.team_id).cloned())
        .collect();
    table.sort_by(|a, b| b.merit().cmp(&a.merit()));

    let mut start = 0;
    while start < table.len() {
        let mut end = start + 1;
        while end < table.len() && table[end].merit() == table[start].merit() {
            end += 1;
        }
        if end - start > 1 {
            break_tie(&mut table[start..end], teams, results);
        }
        start = end;
    }
    table
}

/// Order a run of teams level on overall merit by their head-to-head
/// mini-table, then by team code.
fn break_tie(tied: &mut [TableRow], teams: &[GroupTeam], results: &[GroupResult]) {
    let ids: HashSet<i64> = tied.iter().map(|r| r.team_id).collect();
    let mini = tally(
        teams.iter().filter(|t| ids.contains(&t.team_id)),
        results
            .iter()
            .filter(|r| ids.contains(&r.home_team_id) && ids.contains(&r.away_team_id)),
    );
    let h2h = |row: &TableRow| mini.get(&row.team_id).map(TableRow::merit).unwrap_or_default();
    tied.sort_by(|a, b| h2h(b).cmp(&h2h(a)).then_with(|| a.code.cmp(&b.code)));
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThirdPlaced {
    pub group: char,
    pub row: TableRow,
}

/// Third-placed teams across groups, best first: points, goal difference,
/// goals for, then group letter.
pub fn rank_third_placed(tables: &BTreeMap<char, Vec<TableRow>>) -> Vec<ThirdPlaced> {
    let mut thirds: Vec<ThirdPlaced> = tables
        .iter()
        .filter_map(|(group, table)| {
            table.get(2).map(|row| ThirdPlaced {
                group: *group,
                row: row.clone(),
            })
        })
        .collect();
    thirds.sort_by(|a, b| {
        b.row
            .merit()
            .cmp(&a.row.merit())
            .then_with(|| a.group.cmp(&b.group))
    });
    thirds
}
