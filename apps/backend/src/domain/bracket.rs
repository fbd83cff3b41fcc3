//! Knockout progression: turns group tables and knockout results into the
//! teams occupying each knockout slot.
//!
//! [`resolve`] recomputes every slot from scratch, so it can be re-run after
//! any result change. Slots whose source is not decided come back as `None`.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use super::score::{MatchResult, Side};
use super::slots::SlotCode;
use super::stage::Stage;
use super::standings::{compute_group_table, rank_third_placed, GroupResult, GroupTeam, TableRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInput {
    pub teams: Vec<GroupTeam>,
    /// Finished group matches only.
    pub results: Vec<GroupResult>,
    /// Number of matches the group plays in total.
    pub expected_matches: usize,
}

impl GroupInput {
    pub fn is_complete(&self) -> bool {
        self.expected_matches > 0 && self.results.len() >= self.expected_matches
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnockoutFixture {
    pub match_no: i32,
    pub stage: Stage,
    pub home_slot: SlotCode,
    pub away_slot: SlotCode,
    pub result: Option<MatchResult>,
}

impl KnockoutFixture {
    fn slot(&self, side: Side) -> &SlotCode {
        match side {
            Side::Home => &self.home_slot,
            Side::Away => &self.away_slot,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketInput {
    pub groups: BTreeMap<char, GroupInput>,
    pub knockouts: Vec<KnockoutFixture>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotResolution {
    pub match_no: i32,
    pub side: Side,
    pub team_id: Option<i64>,
}

/// Resolve every knockout slot in `input`, ordered by match number then side.
pub fn resolve(input: &BracketInput) -> Vec<SlotResolution> {
    let tables: BTreeMap<char, Vec<TableRow>> = input
        .groups
        .iter()
        .map(|(g, group)| (*g, compute_group_table(&group.teams, &group.results)))
        .collect();

    let mut fixtures: Vec<&KnockoutFixture> = input.knockouts.iter().collect();
    fixtures.sort_by_key(|f| f.match_no);

    let thirds = assign_best_thirds(input, &tables, &fixtures);
    let by_no: HashMap<i32, &KnockoutFixture> = fixtures.iter().map(|f| (f.match_no, *f)).collect();

    let mut resolved: HashMap<(i32, Side), Option<i64>> = HashMap::new();
    for f in &fixtures {
        for side in [Side::Home, Side::Away] {
            let team = match f.slot(side) {
                SlotCode::GroupWinner(g) => placed(input, &tables, *g, 0),
                SlotCode::GroupRunnerUp(g) => placed(input, &tables, *g, 1),
                SlotCode::BestThird(_) => thirds.get(&(f.match_no, side)).copied(),
                SlotCode::MatchWinner(_) | SlotCode::MatchLoser(_) => None,
            };
            resolved.insert((f.match_no, side), team);
        }
    }

    // W/L slots may feed each other in chains; iterate until nothing moves.
    for _ in 0..=fixtures.len() {
        let mut changed = false;
        for f in &fixtures {
            for side in [Side::Home, Side::Away] {
                let slot = f.slot(side);
                let Some(source_no) = slot.source_match() else {
                    continue;
                };
                let team = by_no
                    .get(&source_no)
                    .and_then(|src| decided_team(src, slot, &resolved));
                if resolved.get(&(f.match_no, side)) != Some(&team) {
                    resolved.insert((f.match_no, side), team);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    fixtures
        .iter()
        .flat_map(|f| {
            [Side::Home, Side::Away].map(|side| SlotResolution {
                match_no: f.match_no,
                side,
                team_id: resolved.get(&(f.match_no, side)).copied().flatten(),
            })
        })
        .collect()
}

/// Team at `index` in group `g`, once the group has finished.
fn placed(
    input: &BracketInput,
    tables: &BTreeMap<char, Vec<TableRow>>,
    g: char,
    index: usize,
) -> Option<i64> {
    let group = input.groups.get(&g)?;
    if !group.is_complete() {
        return None;
    }
    tables.get(&g)?.get(index).map(|row| row.team_id)
}

/// Winner or loser of `src`, if it has a result and both its teams are known.
fn decided_team(
    src: &KnockoutFixture,
    slot: &SlotCode,
    resolved: &HashMap<(i32, Side), Option<i64>>,
) -> Option<i64> {
    let result = src.result?;
    let side = match slot {
        SlotCode::MatchWinner(_) => result.winner_side()?,
        SlotCode::MatchLoser(_) => result.loser_side()?,
        _ => return None,
    };
    let home = resolved.get(&(src.match_no, Side::Home)).copied().flatten()?;
    let away = resolved.get(&(src.match_no, Side::Away)).copied().flatten()?;
    Some(match side {
        Side::Home => home,
        Side::Away => away,
    })
}

/// Assign best third-placed teams to `3…` slots once every group is done.
fn assign_best_thirds(
    input: &BracketInput,
    tables: &BTreeMap<char, Vec<TableRow>>,
    fixtures: &[&KnockoutFixture],
) -> HashMap<(i32, Side), i64> {
    let slots: Vec<((i32, Side), &[char])> = fixtures
        .iter()
        .flat_map(|f| {
            [Side::Home, Side::Away]
                .into_iter()
                .filter_map(move |side| match f.slot(side) {
                    SlotCode::BestThird(groups) => Some(((f.match_no, side), groups.as_slice())),
                    _ => None,
                })
        })
        .collect();

    if slots.is_empty()
        || input.groups.is_empty()
        || !input.groups.values().all(GroupInput::is_complete)
    {
        return HashMap::new();
    }

    let qualified: Vec<(char, i64)> = rank_third_placed(tables)
        .into_iter()
        .take(slots.len())
        .map(|t| (t.group, t.row.team_id))
        .collect();

    let mut used = vec![false; qualified.len()];
    let mut chosen = vec![usize::MAX; slots.len()];
    if !match_slots(0, &slots, &qualified, &mut used, &mut chosen) {
        warn!(
            slots = slots.len(),
            qualified = qualified.len(),
            "no valid assignment of third-placed teams to slots"
        );
        return HashMap::new();
    }

    slots
        .iter()
        .zip(chosen)
        .map(|((key, _), idx)| (*key, qualified[idx].1))
        .collect()
}

/// Depth-first matching: slot `i` takes the best unused candidate from a group
/// it lists, backtracking when later slots run dry.
fn match_slots(
    i: usize,
    slots: &[((i32, Side), &[char])],
    candidates: &[(char, i64)],
    used: &mut [bool],
    chosen: &mut [usize],
) -> bool {
    let Some((_, allowed)) = slots.get(i) else {
        return true;
    };
    for (c, (group, _)) in candidates.iter().enumerate() {
        if used[c] || !allowed.contains(group) {
            continue;
        }
        used[c] = true;
        chosen[i] = c;
        if match_slots(i + 1, slots, candidates, used, chosen) {
            return true;
        }
        used[c] = false;
    }
    false
}
