//! Validation of a bulk fixture import before anything is written.
//!
//! [`plan_import`] checks the submitted teams and matches against each other
//! and against what the tournament already holds, and returns a plan the
//! service can insert in order.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use time::OffsetDateTime;

use super::slots::{SlotCode, FIRST_GROUP, LAST_GROUP};
use super::stage::Stage;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

pub const MAX_TEAM_CODE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamSpec {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchSpec {
    pub match_no: i32,
    pub stage: String,
    #[serde(default)]
    pub group: Option<String>,
    /// Team codes, group stage only.
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    /// Slot codes, knockout stages only.
    #[serde(default)]
    pub home_slot: Option<String>,
    #[serde(default)]
    pub away_slot: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTeam {
    pub code: String,
    pub name: String,
    pub group: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedSides {
    Teams { home: String, away: String },
    Slots { home: SlotCode, away: SlotCode },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMatch {
    pub match_no: i32,
    pub stage: Stage,
    pub group: Option<char>,
    pub sides: PlannedSides,
    pub kickoff_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixturePlan {
    pub teams: Vec<PlannedTeam>,
    pub matches: Vec<PlannedMatch>,
}

/// What the tournament already holds.
#[derive(Debug, Clone, Default)]
pub struct ExistingFixtures {
    /// Team code -> group.
    pub teams: BTreeMap<String, Option<char>>,
    /// Match number -> stage.
    pub matches: BTreeMap<i32, Stage>,
}

fn invalid(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::InvalidFixture, detail)
}

fn duplicate(detail: impl Into<String>) -> DomainError {
    DomainError::conflict(ConflictKind::DuplicateFixture, detail)
}

fn parse_group(raw: Option<&str>) -> Result<Option<char>, DomainError> {
    let Some(raw) = raw.map(str::trim).filter(|g| !g.is_empty()) else {
        return Ok(None);
    };
    let mut chars = raw.chars();
    match (chars.next().map(|c| c.to_ascii_uppercase()), chars.next()) {
        (Some(g), None) if (FIRST_GROUP..=LAST_GROUP).contains(&g) => Ok(Some(g)),
        _ => Err(invalid(format!(
            "Group '{raw}' must be a single letter {FIRST_GROUP}..{LAST_GROUP}"
        ))),
    }
}

fn normalize_team_code(raw: &str) -> Result<String, DomainError> {
    let code = raw.trim().to_ascii_uppercase();
    let ok = (2..=MAX_TEAM_CODE_LEN).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_alphanumeric());
    if ok {
        Ok(code)
    } else {
        Err(invalid(format!(
            "Team code '{raw}' must be 2-{MAX_TEAM_CODE_LEN} letters or digits"
        )))
    }
}

fn plan_teams(
    specs: &[TeamSpec],
    existing: &ExistingFixtures,
) -> Result<Vec<PlannedTeam>, DomainError> {
    let mut seen = BTreeSet::new();
    let mut planned = Vec::with_capacity(specs.len());
    for spec in specs {
        let code = normalize_team_code(&spec.code)?;
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(invalid(format!("Team {code} needs a name")));
        }
        if existing.teams.contains_key(&code) || !seen.insert(code.clone()) {
            return Err(duplicate(format!("Team code {code} appears more than once")));
        }
        planned.push(PlannedTeam {
            code,
            name: name.to_string(),
            group: parse_group(spec.group.as_deref())?,
        });
    }
    Ok(planned)
}

fn group_sides(
    spec: &MatchSpec,
    group: Option<char>,
    team_groups: &BTreeMap<String, Option<char>>,
) -> Result<PlannedSides, DomainError> {
    let n = spec.match_no;
    let Some(group) = group else {
        return Err(invalid(format!("Group match {n} needs a group")));
    };
    if spec.home_slot.is_some() || spec.away_slot.is_some() {
        return Err(invalid(format!("Group match {n} takes team codes, not slots")));
    }
    let (Some(home), Some(away)) = (spec.home_team.as_deref(), spec.away_team.as_deref()) else {
        return Err(invalid(format!("Group match {n} needs home_team and away_team")));
    };
    let home = normalize_team_code(home)?;
    let away = normalize_team_code(away)?;
    if home == away {
        return Err(invalid(format!("Match {n} pits {home} against itself")));
    }
    for code in [&home, &away] {
        match team_groups.get(code) {
            None => return Err(invalid(format!("Match {n} references unknown team {code}"))),
            Some(team_group) if *team_group != Some(group) => {
                return Err(invalid(format!(
                    "Team {code} is not drawn in group {group} (match {n})"
                )))
            }
            Some(_) => {}
        }
    }
    Ok(PlannedSides::Teams { home, away })
}

fn knockout_sides(spec: &MatchSpec, group: Option<char>) -> Result<PlannedSides, DomainError> {
    let n = spec.match_no;
    if group.is_some() {
        return Err(invalid(format!("Knockout match {n} cannot belong to a group")));
    }
    if spec.home_team.is_some() || spec.away_team.is_some() {
        return Err(invalid(format!("Knockout match {n} takes slot codes, not teams")));
    }
    let (Some(home), Some(away)) = (spec.home_slot.as_deref(), spec.away_slot.as_deref()) else {
        return Err(invalid(format!("Knockout match {n} needs home_slot and away_slot")));
    };
    Ok(PlannedSides::Slots {
        home: home.trim().parse()?,
        away: away.trim().parse()?,
    })
}

/// Validate a fixture import against itself and the stored fixtures.
pub fn plan_import(
    teams: &[TeamSpec],
    matches: &[MatchSpec],
    existing: &ExistingFixtures,
) -> Result<FixturePlan, DomainError> {
    let planned_teams = plan_teams(teams, existing)?;

    let mut team_groups = existing.teams.clone();
    team_groups.extend(planned_teams.iter().map(|t| (t.code.clone(), t.group)));

    let mut stages: BTreeMap<i32, Stage> = existing.matches.clone();
    let mut planned_matches = Vec::with_capacity(matches.len());
    for spec in matches {
        if spec.match_no <= 0 {
            return Err(invalid(format!("Match number {} must be positive", spec.match_no)));
        }
        let stage: Stage = spec.stage.parse()?;
        if stages.insert(spec.match_no, stage).is_some() {
            return Err(duplicate(format!(
                "Match number {} appears more than once",
                spec.match_no
            )));
        }
        let group = parse_group(spec.group.as_deref())?;
        let sides = if stage.is_knockout() {
            knockout_sides(spec, group)?
        } else {
            group_sides(spec, group, &team_groups)?
        };
        planned_matches.push(PlannedMatch {
            match_no: spec.match_no,
            stage,
            group,
            sides,
            kickoff_at: spec.kickoff_at,
        });
    }

    // W/L slots must point at a knockout match of this tournament.
    for planned in &planned_matches {
        if let PlannedSides::Slots { home, away } = &planned.sides {
            for source in [home, away].into_iter().filter_map(SlotCode::source_match) {
                match stages.get(&source) {
                    Some(stage) if stage.is_knockout() && source != planned.match_no => {}
                    _ => {
                        return Err(invalid(format!(
                            "Match {} depends on match {source}, which is not another knockout fixture",
                            planned.match_no
                        )))
                    }
                }
            }
        }
    }

    Ok(FixturePlan {
        teams: planned_teams,
        matches: planned_matches,
    })
}
