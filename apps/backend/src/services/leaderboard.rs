//! League leaderboards, computed from stored points and cached per epoch.

use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::ConnectionTrait;
use tracing::debug;

use super::leaderboard_cache::{CachedLeaderboard, LeaderboardCache};
use crate::domain::leaderboard::{
    rank_departments, rank_members, DepartmentEntry, LeaderboardEntry, MemberRow, MemberTotals,
};
use crate::domain::plans::{require_feature, Feature};
use crate::errors::domain::DomainError;
use crate::repos::bracket_picks::{self, BracketPick};
use crate::repos::departments;
use crate::repos::leagues;
use crate::repos::members::{self, Membership};
use crate::repos::predictions::{self, Prediction};
use crate::repos::users;

/// Fold stored points into per-membership totals.
pub fn tally(
    predictions: &[Prediction],
    picks: &[BracketPick],
) -> HashMap<i64, MemberTotals> {
    let mut totals: HashMap<i64, MemberTotals> = HashMap::new();
    for p in predictions {
        let t = totals.entry(p.member_id).or_default();
        t.match_points += i64::from(p.points.unwrap_or(0));
        t.exact_hits += i64::from(p.exact_hit);
        t.outcome_hits += i64::from(p.outcome_hit);
        t.jokers_used += i64::from(p.predicted.joker);
    }
    for pick in picks {
        totals.entry(pick.member_id).or_default().bracket_points +=
            i64::from(pick.points.unwrap_or(0));
    }
    totals
}

pub struct LeaderboardService;

impl LeaderboardService {
    pub fn new() -> Self {
        Self
    }

    /// Ranked members of a league straight from the database.
    pub async fn compute<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        league_id: i64,
    ) -> Result<Vec<LeaderboardEntry>, DomainError> {
        let roster = members::list_members(conn, league_id).await?;
        let member_ids: Vec<i64> = roster.iter().map(|m| m.id).collect();
        let user_ids: Vec<i64> = roster.iter().map(|m| m.user_id).collect();

        let names: HashMap<i64, String> = users::find_users_by_ids(conn, user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.display_name()))
            .collect();
        let departments: HashMap<i64, String> = departments::list_departments(conn, league_id)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        let scored = predictions::list_for_members(conn, member_ids.clone()).await?;
        let picks = bracket_picks::list_for_members(conn, member_ids).await?;
        let totals = tally(&scored, &picks);

        let rows = roster
            .into_iter()
            .map(|m| {
                let row = MemberRow {
                    membership_id: m.id,
                    user_id: m.user_id,
                    display_name: names
                        .get(&m.user_id)
                        .cloned()
                        .unwrap_or_else(|| format!("user-{}", m.user_id)),
                    department_id: m.department_id,
                    department_name: m
                        .department_id
                        .and_then(|id| departments.get(&id).cloned()),
                    joined_at: m.joined_at,
                };
                (row, totals.get(&m.id).copied().unwrap_or_default())
            })
            .collect();

        let ranked = rank_members(rows);
        debug!(league_id, members = ranked.len(), "Leaderboard computed");
        Ok(ranked)
    }

    /// Member leaderboard through the shared cache.
    pub async fn members<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        cache: &LeaderboardCache,
        member: &Membership,
    ) -> Result<Arc<CachedLeaderboard>, DomainError> {
        cache
            .get_or_build(member.league_id, || self.compute(conn, member.league_id))
            .await
    }

    /// Department averages; needs the departments feature.
    pub async fn departments<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        cache: &LeaderboardCache,
        member: &Membership,
    ) -> Result<Vec<DepartmentEntry>, DomainError> {
        let league = leagues::require_league(conn, member.league_id).await?;
        require_feature(&league.plan.features(), Feature::Departments)?;
        let board = self.members(conn, cache, member).await?;
        Ok(rank_departments(&board.entries))
    }
}

impl Default for LeaderboardService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::domain::scoring::PredictedScore;
    use crate::domain::MatchScore;

    fn prediction(member_id: i64, points: Option<i32>, exact: bool, joker: bool) -> Prediction {
        Prediction {
            id: 0,
            member_id,
            match_id: 1,
            predicted: PredictedScore {
                score: MatchScore { home: 1, away: 0 },
                advances: None,
                joker,
            },
            points,
            exact_hit: exact,
            outcome_hit: points.is_some_and(|p| p > 0),
            updated_at: datetime!(2026-06-11 12:00 UTC),
        }
    }

    #[test]
    fn tally_sums_points_hits_and_jokers() {
        let preds = vec![
            prediction(1, Some(10), true, true),
            prediction(1, Some(3), false, false),
            prediction(2, None, false, true),
        ];
        let picks = vec![BracketPick {
            id: 1,
            member_id: 2,
            match_id: 50,
            team_id: 7,
            points: Some(6),
        }];
        let totals = tally(&preds, &picks);

        let one = totals[&1];
        assert_eq!(one.match_points, 13);
        assert_eq!(one.exact_hits, 1);
        assert_eq!(one.outcome_hits, 2);
        assert_eq!(one.jokers_used, 1);

        let two = totals[&2];
        assert_eq!(two.match_points, 0);
        assert_eq!(two.bracket_points, 6);
        assert_eq!(two.jokers_used, 1);
    }
}
