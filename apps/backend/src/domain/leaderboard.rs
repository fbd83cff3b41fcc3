//! League leaderboard ranking for members and departments.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub membership_id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub joined_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberTotals {
    pub match_points: i64,
    pub bracket_points: i64,
    pub exact_hits: i64,
    pub outcome_hits: i64,
    pub jokers_used: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub membership_id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub match_points: i64,
    pub bracket_points: i64,
    pub total: i64,
    pub exact_hits: i64,
    pub outcome_hits: i64,
    pub jokers_used: i64,
}

impl LeaderboardEntry {
    fn standing(&self) -> (i64, i64, i64) {
        (self.total, self.exact_hits, self.outcome_hits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentEntry {
    pub rank: u32,
    pub department_id: i64,
    pub name: String,
    pub members: u32,
    pub total_points: i64,
    /// Average points per member, in hundredths.
    pub average_hundredths: i64,
}

/// Standard competition ranks (1, 2, 2, 4) over an already sorted list.
fn assign_ranks<T, K: PartialEq>(items: &mut [T], key: impl Fn(&T) -> K, set: impl Fn(&mut T, u32)) {
    let mut prev: Option<K> = None;
    let mut rank = 0u32;
    for (i, item) in items.iter_mut().enumerate() {
        let k = key(&*item);
        if prev.as_ref() != Some(&k) {
            rank = i as u32 + 1;
        }
        set(item, rank);
        prev = Some(k);
    }
}

/// Total desc, exact hits desc, outcome hits desc, then display name.
pub fn rank_members(members: Vec<(MemberRow, MemberTotals)>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = members
        .into_iter()
        .map(|(m, t)| LeaderboardEntry {
            rank: 0,
            membership_id: m.membership_id,
            user_id: m.user_id,
            display_name: m.display_name,
            department_id: m.department_id,
            department_name: m.department_name,
            match_points: t.match_points,
            bracket_points: t.bracket_points,
            total: t.match_points + t.bracket_points,
            exact_hits: t.exact_hits,
            outcome_hits: t.outcome_hits,
            jokers_used: t.jokers_used,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.standing()
            .cmp(&a.standing())
            .then_with(|| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()))
            .then_with(|| a.membership_id.cmp(&b.membership_id))
    });
    assign_ranks(&mut entries, LeaderboardEntry::standing, |e, r| e.rank = r);
    entries
}

/// Average member total per department; members without one are skipped.
pub fn rank_departments(entries: &[LeaderboardEntry]) -> Vec<DepartmentEntry> {
    let mut by_dept: BTreeMap<i64, DepartmentEntry> = BTreeMap::new();
    for e in entries {
        let (Some(id), Some(name)) = (e.department_id, e.department_name.as_ref()) else {
            continue;
        };
        let d = by_dept.entry(id).or_insert_with(|| DepartmentEntry {
            rank: 0,
            department_id: id,
            name: name.clone(),
            members: 0,
            total_points: 0,
            average_hundredths: 0,
        });
        d.members += 1;
        d.total_points += e.total;
    }

    let mut depts: Vec<DepartmentEntry> = by_dept
        .into_values()
        .map(|mut d| {
            d.average_hundredths = d.total_points * 100 / i64::from(d.members.max(1));
            d
        })
        .collect();

    depts.sort_by(|a, b| match b.average_hundredths.cmp(&a.average_hundredths) {
        Ordering::Equal => b
            .total_points
            .cmp(&a.total_points)
            .then_with(|| a.name.cmp(&b.name)),
        other => other,
    });
    assign_ranks(
        &mut depts,
        |d| (d.average_hundredths, d.total_points),
        |d, r| d.rank = r,
    );
    depts
}
