//! Prediction repository functions for domain layer.

use sea_orm::ConnectionTrait;

use super::corrupt_row;
use super::fixtures::Fixture;
use crate::adapters::predictions_sea as predictions_adapter;
use crate::domain::scoring::{PredictedScore, PredictionPoints};
use crate::domain::{JokerPhase, MatchScore, Side, Stage};
use crate::entities::predictions;
use crate::errors::domain::DomainError;

/// Prediction domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub id: i64,
    pub member_id: i64,
    pub match_id: i64,
    pub predicted: PredictedScore,
    pub points: Option<i32>,
    pub exact_hit: bool,
    pub outcome_hit: bool,
    pub updated_at: time::OffsetDateTime,
}

pub async fn find_for_member_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    match_id: i64,
) -> Result<Option<Prediction>, DomainError> {
    predictions_adapter::find_for_member_match(conn, member_id, match_id)
        .await?
        .map(Prediction::try_from)
        .transpose()
}

pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    match_id: i64,
    predicted: PredictedScore,
) -> Result<Prediction, DomainError> {
    let dto = predictions_adapter::PredictionWrite {
        member_id,
        match_id,
        home_goals: i16::from(predicted.score.home),
        away_goals: i16::from(predicted.score.away),
        advances: predicted.advances.map(|s| s.as_str().to_string()),
        joker: predicted.joker,
    };
    let model = predictions_adapter::upsert(conn, dto).await?;
    Prediction::try_from(model)
}

pub async fn clear_joker<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    prediction_id: i64,
) -> Result<(), DomainError> {
    predictions_adapter::clear_joker(conn, prediction_id).await?;
    Ok(())
}

/// The member's joker predictions within `phase`, paired with their match.
pub async fn jokers_in_phase<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    phase: JokerPhase,
) -> Result<Vec<(Prediction, Fixture)>, DomainError> {
    let stages = Stage::in_joker_phase(phase)
        .map(|s| s.as_str().to_string())
        .collect();
    let rows = predictions_adapter::jokers_in_stages(conn, member_id, stages).await?;

    let mut out = Vec::with_capacity(rows.len());
    for (prediction, fixture) in rows {
        if let Some(fixture) = fixture {
            out.push((Prediction::try_from(prediction)?, Fixture::try_from(fixture)?));
        }
    }
    Ok(out)
}

pub async fn list_for_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<Vec<Prediction>, DomainError> {
    let models = predictions_adapter::list_for_member(conn, member_id).await?;
    models.into_iter().map(Prediction::try_from).collect()
}

pub async fn list_for_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_ids: Vec<i64>,
) -> Result<Vec<Prediction>, DomainError> {
    let models = predictions_adapter::list_for_members(conn, member_ids).await?;
    models.into_iter().map(Prediction::try_from).collect()
}

pub async fn list_for_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<Prediction>, DomainError> {
    let models = predictions_adapter::list_for_match(conn, match_id).await?;
    models.into_iter().map(Prediction::try_from).collect()
}

pub async fn list_for_league_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    match_id: i64,
) -> Result<Vec<Prediction>, DomainError> {
    let models = predictions_adapter::list_for_league_match(conn, league_id, match_id).await?;
    models.into_iter().map(Prediction::try_from).collect()
}

/// Write scoring output; `None` clears it.
pub async fn set_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    prediction_id: i64,
    points: Option<PredictionPoints>,
) -> Result<(), DomainError> {
    let score = predictions_adapter::PredictionScore {
        id: prediction_id,
        points: points.map(|p| p.total),
        exact_hit: points.is_some_and(|p| p.exact),
        outcome_hit: points.is_some_and(|p| p.outcome_hit),
    };
    predictions_adapter::set_score(conn, score).await?;
    Ok(())
}

impl TryFrom<predictions::Model> for Prediction {
    type Error = DomainError;

    fn try_from(model: predictions::Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let score = MatchScore::new(i32::from(model.home_goals), i32::from(model.away_goals))
            .map_err(|e| corrupt_row("predictions", id, e))?;
        let advances = model
            .advances
            .as_deref()
            .map(str::parse::<Side>)
            .transpose()
            .map_err(|e| corrupt_row("predictions", id, e))?;

        Ok(Self {
            id,
            member_id: model.member_id,
            match_id: model.match_id,
            predicted: PredictedScore {
                score,
                advances,
                joker: model.joker,
            },
            points: model.points,
            exact_hit: model.exact_hit,
            outcome_hit: model.outcome_hit,
            updated_at: model.updated_at,
        })
    }
}
