//! League ad repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::ads_sea as ads_adapter;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ad {
    pub id: i64,
    pub league_id: i64,
    pub title: String,
    pub image_url: String,
    pub target_url: String,
    pub placement: String,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewAd {
    pub title: String,
    pub image_url: String,
    pub target_url: String,
    pub placement: String,
    pub active: bool,
}

pub async fn create_ad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    ad: NewAd,
) -> Result<Ad, DomainError> {
    let dto = ads_adapter::AdCreate {
        league_id,
        title: ad.title,
        image_url: ad.image_url,
        target_url: ad.target_url,
        placement: ad.placement,
        active: ad.active,
    };
    let model = ads_adapter::create_ad(conn, dto).await?;
    Ok(Ad::from(model))
}

pub async fn list_ads<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    active_only: bool,
) -> Result<Vec<Ad>, DomainError> {
    let models = ads_adapter::list_for_league(conn, league_id, active_only).await?;
    Ok(models.into_iter().map(Ad::from).collect())
}

pub async fn delete_ad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    ad_id: i64,
) -> Result<bool, DomainError> {
    Ok(ads_adapter::delete_ad(conn, league_id, ad_id).await?)
}

impl From<crate::entities::league_ads::Model> for Ad {
    fn from(model: crate::entities::league_ads::Model) -> Self {
        Self {
            id: model.id,
            league_id: model.league_id,
            title: model.title,
            image_url: model.image_url,
            target_url: model.target_url,
            placement: model.placement,
            active: model.active,
        }
    }
}
