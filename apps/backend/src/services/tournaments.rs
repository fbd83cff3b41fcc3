//! Tournament administration and read models: fixtures, group tables and the
//! resolved knockout bracket.

use std::collections::BTreeMap;

use lazy_regex::regex_is_match;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;

use crate::domain::bracket::{BracketInput, GroupInput, KnockoutFixture};
use crate::domain::fixtures::{plan_import, ExistingFixtures, MatchSpec, PlannedSides, TeamSpec};
use crate::domain::slots::SlotCode;
use crate::domain::standings::{compute_group_table, GroupResult, GroupTeam, TableRow};
use crate::domain::Stage;
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};
use crate::repos::fixtures::{self, Fixture, NewFixture};
use crate::repos::tournaments::{self, Team, Tournament};

/// Longest prediction lock a tournament may configure (one day).
pub const MAX_LOCK_MINUTES: i32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub teams_created: usize,
    pub matches_created: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStanding {
    pub group: char,
    pub complete: bool,
    pub rows: Vec<TableRow>,
}

/// Fixtures of a tournament loaded once and reused by the read models.
#[derive(Debug, Clone)]
pub struct TournamentFixtures {
    pub teams: Vec<Team>,
    pub fixtures: Vec<Fixture>,
}

impl TournamentFixtures {
    pub async fn load<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        tournament_id: i64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            teams: tournaments::list_teams(conn, tournament_id).await?,
            fixtures: fixtures::list_fixtures(conn, tournament_id, None).await?,
        })
    }

    pub fn knockouts(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter().filter(|f| f.stage.is_knockout())
    }

    fn groups(&self) -> BTreeMap<char, GroupInput> {
        let mut groups: BTreeMap<char, GroupInput> = BTreeMap::new();
        for team in &self.teams {
            if let Some(g) = team.group {
                groups.entry(g).or_insert_with(empty_group).teams.push(GroupTeam {
                    team_id: team.id,
                    code: team.code.clone(),
                });
            }
        }
        for fixture in self.fixtures.iter().filter(|f| f.stage == Stage::Group) {
            let Some(g) = fixture.group else { continue };
            let group = groups.entry(g).or_insert_with(empty_group);
            group.expected_matches += 1;
            if let (Some(result), Some(home), Some(away)) =
                (fixture.result, fixture.home_team_id, fixture.away_team_id)
            {
                group.results.push(GroupResult {
                    home_team_id: home,
                    away_team_id: away,
                    score: result.score,
                });
            }
        }
        groups
    }

    /// Input for [`crate::domain::bracket::resolve`].
    pub fn bracket_input(&self) -> Result<BracketInput, DomainError> {
        let knockouts = self
            .knockouts()
            .map(|f| {
                Ok(KnockoutFixture {
                    match_no: f.match_no,
                    stage: f.stage,
                    home_slot: stored_slot(f, f.home_slot.as_deref())?,
                    away_slot: stored_slot(f, f.away_slot.as_deref())?,
                    result: f.result,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(BracketInput {
            groups: self.groups(),
            knockouts,
        })
    }

    pub fn standings(&self) -> Vec<GroupStanding> {
        self.groups()
            .into_iter()
            .map(|(group, input)| GroupStanding {
                group,
                complete: input.is_complete(),
                rows: compute_group_table(&input.teams, &input.results),
            })
            .collect()
    }
}

fn empty_group() -> GroupInput {
    GroupInput {
        teams: Vec::new(),
        results: Vec::new(),
        expected_matches: 0,
    }
}

fn stored_slot(fixture: &Fixture, raw: Option<&str>) -> Result<SlotCode, DomainError> {
    raw.ok_or_else(|| "missing slot code".to_string())
        .and_then(|s| s.parse::<SlotCode>().map_err(|e| e.to_string()))
        .map_err(|why| {
            tracing::error!(match_id = fixture.id, why = %why, "knockout fixture has a bad slot");
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Match {} has an invalid slot", fixture.match_no),
            )
        })
}

fn validate_tournament(slug: &str, name: &str, lock_minutes: i32) -> Result<(), DomainError> {
    if !regex_is_match!(r"^[a-z0-9]+(?:-[a-z0-9]+)*$", slug) || slug.len() > 64 {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            "Slug must be lowercase letters, digits and single hyphens",
        ));
    }
    if name.trim().is_empty() || name.chars().count() > 120 {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            "Tournament name must be 1-120 characters",
        ));
    }
    if !(0..=MAX_LOCK_MINUTES).contains(&lock_minutes) {
        return Err(DomainError::validation_other(format!(
            "prediction_lock_minutes must be between 0 and {MAX_LOCK_MINUTES}"
        )));
    }
    Ok(())
}

/// Tournament domain service.
pub struct TournamentService;

impl TournamentService {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        slug: &str,
        name: &str,
        prediction_lock_minutes: i32,
    ) -> Result<Tournament, DomainError> {
        let slug = slug.trim().to_ascii_lowercase();
        validate_tournament(&slug, name, prediction_lock_minutes)?;
        let tournament = tournaments::create_tournament(
            conn,
            slug,
            name.trim().to_string(),
            prediction_lock_minutes,
        )
        .await?;
        info!(tournament_id = tournament.id, slug = %tournament.slug, "Tournament created");
        Ok(tournament)
    }

    /// Validate and insert teams and matches in one go.
    pub async fn import_fixtures<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tournament_id: i64,
        teams: &[TeamSpec],
        matches: &[MatchSpec],
    ) -> Result<ImportSummary, DomainError> {
        tournaments::require_tournament(conn, tournament_id).await?;
        let current = TournamentFixtures::load(conn, tournament_id).await?;

        let existing = ExistingFixtures {
            teams: current
                .teams
                .iter()
                .map(|t| (t.code.clone(), t.group))
                .collect(),
            matches: current
                .fixtures
                .iter()
                .map(|f| (f.match_no, f.stage))
                .collect(),
        };
        let plan = plan_import(teams, matches, &existing)?;

        let mut team_ids: BTreeMap<String, i64> = current
            .teams
            .iter()
            .map(|t| (t.code.clone(), t.id))
            .collect();
        for team in &plan.teams {
            let created = tournaments::create_team(
                conn,
                tournament_id,
                team.code.clone(),
                team.name.clone(),
                team.group,
            )
            .await?;
            team_ids.insert(created.code, created.id);
        }

        for planned in &plan.matches {
            let (home_slot, away_slot, home_team_id, away_team_id) = match &planned.sides {
                PlannedSides::Teams { home, away } => (
                    None,
                    None,
                    team_ids.get(home).copied(),
                    team_ids.get(away).copied(),
                ),
                PlannedSides::Slots { home, away } => {
                    (Some(home.to_string()), Some(away.to_string()), None, None)
                }
            };
            fixtures::create_fixture(
                conn,
                NewFixture {
                    tournament_id,
                    match_no: planned.match_no,
                    stage: planned.stage,
                    group: planned.group,
                    home_slot,
                    away_slot,
                    home_team_id,
                    away_team_id,
                    kickoff_at: planned.kickoff_at,
                },
            )
            .await?;
        }

        let summary = ImportSummary {
            teams_created: plan.teams.len(),
            matches_created: plan.matches.len(),
        };
        info!(
            tournament_id,
            teams = summary.teams_created,
            matches = summary.matches_created,
            "Fixtures imported"
        );
        Ok(summary)
    }

    pub async fn standings<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tournament_id: i64,
    ) -> Result<Vec<GroupStanding>, DomainError> {
        tournaments::require_tournament(conn, tournament_id).await?;
        Ok(TournamentFixtures::load(conn, tournament_id).await?.standings())
    }

    /// Knockout fixtures with the teams resolved so far.
    pub async fn bracket<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tournament_id: i64,
    ) -> Result<TournamentFixtures, DomainError> {
        tournaments::require_tournament(conn, tournament_id).await?;
        let mut loaded = TournamentFixtures::load(conn, tournament_id).await?;
        loaded.fixtures.retain(|f| f.stage.is_knockout());
        Ok(loaded)
    }
}

impl Default for TournamentService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tournament_validation() {
        assert!(validate_tournament("wc-2026", "World Cup", 0).is_ok());
        assert!(validate_tournament("WC 2026", "World Cup", 0).is_err());
        assert!(validate_tournament("wc--2026", "World Cup", 0).is_err());
        assert!(validate_tournament("wc-2026", "  ", 0).is_err());
        assert!(validate_tournament("wc-2026", "World Cup", -1).is_err());
        assert!(validate_tournament("wc-2026", "World Cup", MAX_LOCK_MINUTES + 1).is_err());
    }
}
