//! Tier-gated enterprise features: branding, social links, departments, ads.

use std::collections::BTreeMap;

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::domain::branding::{validate_hex_color, validate_https_url, validate_social_links};
use crate::domain::plans::{require_feature, Feature};
use crate::domain::roles::LeagueRole;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::ads::{self, Ad, NewAd};
use crate::repos::departments::{self, Department};
use crate::repos::leagues::{self, Branding, League};
use crate::repos::members::{self, Membership};

pub const MAX_DEPARTMENT_CHARS: usize = 60;
pub const MAX_AD_TITLE_CHARS: usize = 120;
pub const AD_PLACEMENTS: [&str; 3] = ["BANNER", "SIDEBAR", "LEADERBOARD"];

#[derive(Debug, Clone, Default)]
pub struct BrandingInput {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdInput {
    pub title: String,
    pub image_url: String,
    pub target_url: String,
    pub placement: Option<String>,
    pub active: bool,
}

fn validate_branding(input: BrandingInput) -> Result<Branding, DomainError> {
    Ok(Branding {
        logo_url: input.logo_url.as_deref().map(validate_https_url).transpose()?,
        primary_color: input
            .primary_color
            .as_deref()
            .map(validate_hex_color)
            .transpose()?,
        secondary_color: input
            .secondary_color
            .as_deref()
            .map(validate_hex_color)
            .transpose()?,
    })
}

fn validate_ad(input: AdInput) -> Result<NewAd, DomainError> {
    let title = input.title.trim();
    if title.is_empty() || title.chars().count() > MAX_AD_TITLE_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            format!("Ad title must be 1-{MAX_AD_TITLE_CHARS} characters"),
        ));
    }
    let placement = match input.placement {
        None => AD_PLACEMENTS[0].to_string(),
        Some(raw) => {
            let p = raw.trim().to_ascii_uppercase();
            if !AD_PLACEMENTS.contains(&p.as_str()) {
                return Err(DomainError::validation_other(format!(
                    "Unknown ad placement '{raw}'"
                )));
            }
            p
        }
    };
    Ok(NewAd {
        title: title.to_string(),
        image_url: validate_https_url(&input.image_url)?,
        target_url: validate_https_url(&input.target_url)?,
        placement,
        active: input.active,
    })
}

/// Loads the league and checks role and plan before any enterprise write.
async fn gate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    actor: &Membership,
    min_role: LeagueRole,
    feature: Feature,
) -> Result<League, DomainError> {
    actor.role.require(min_role)?;
    let league = leagues::require_league(conn, actor.league_id).await?;
    require_feature(&league.plan.features(), feature)?;
    Ok(league)
}

pub struct EnterpriseService;

impl EnterpriseService {
    pub fn new() -> Self {
        Self
    }

    pub async fn set_branding<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        input: BrandingInput,
    ) -> Result<League, DomainError> {
        gate(conn, actor, LeagueRole::Admin, Feature::Branding).await?;
        let branding = validate_branding(input)?;
        let league = leagues::set_branding(conn, actor.league_id, branding).await?;
        info!(league_id = league.id, "League branding updated");
        Ok(league)
    }

    pub async fn set_social_links<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        links: &BTreeMap<String, String>,
    ) -> Result<League, DomainError> {
        gate(conn, actor, LeagueRole::Admin, Feature::SocialLinks).await?;
        let links = validate_social_links(links)?;
        leagues::set_social_links(conn, actor.league_id, &links).await
    }

    pub async fn create_department<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        name: &str,
    ) -> Result<Department, DomainError> {
        gate(conn, actor, LeagueRole::Admin, Feature::Departments).await?;
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_DEPARTMENT_CHARS {
            return Err(DomainError::validation(
                ValidationKind::InvalidName,
                format!("Department name must be 1-{MAX_DEPARTMENT_CHARS} characters"),
            ));
        }
        departments::create_department(conn, actor.league_id, name.to_string()).await
    }

    /// Any member may read the department list.
    pub async fn list_departments<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
    ) -> Result<Vec<Department>, DomainError> {
        gate(conn, actor, LeagueRole::Member, Feature::Departments).await?;
        departments::list_departments(conn, actor.league_id).await
    }

    /// Members may set their own department; ADMIN+ may set anyone's.
    pub async fn assign_department<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        target_user_id: i64,
        department_id: Option<i64>,
    ) -> Result<Membership, DomainError> {
        let min_role = if target_user_id == actor.user_id {
            LeagueRole::Member
        } else {
            LeagueRole::Admin
        };
        gate(conn, actor, min_role, Feature::Departments).await?;

        if let Some(id) = department_id {
            let belongs = departments::find_department(conn, id)
                .await?
                .is_some_and(|d| d.league_id == actor.league_id);
            if !belongs {
                return Err(DomainError::not_found(
                    NotFoundKind::Department,
                    format!("Department {id} is not part of this league"),
                ));
            }
        }

        let target = members::require_membership(conn, actor.league_id, target_user_id).await?;
        members::set_department(conn, target.id, department_id).await?;
        Ok(Membership {
            department_id,
            ..target
        })
    }

    pub async fn create_ad<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        input: AdInput,
    ) -> Result<Ad, DomainError> {
        gate(conn, actor, LeagueRole::Admin, Feature::Ads).await?;
        let ad = ads::create_ad(conn, actor.league_id, validate_ad(input)?).await?;
        info!(league_id = ad.league_id, ad_id = ad.id, "League ad created");
        Ok(ad)
    }

    /// ADMIN+ see every ad, members only active ones.
    pub async fn list_ads<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
    ) -> Result<Vec<Ad>, DomainError> {
        gate(conn, actor, LeagueRole::Member, Feature::Ads).await?;
        let active_only = !actor.role.at_least(LeagueRole::Admin);
        ads::list_ads(conn, actor.league_id, active_only).await
    }

    pub async fn delete_ad<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        ad_id: i64,
    ) -> Result<(), DomainError> {
        gate(conn, actor, LeagueRole::Admin, Feature::Ads).await?;
        if ads::delete_ad(conn, actor.league_id, ad_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found(
                NotFoundKind::Ad,
                format!("Ad {ad_id} not found"),
            ))
        }
    }
}

impl Default for EnterpriseService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(placement: Option<&str>) -> AdInput {
        AdInput {
            title: " Promo ".into(),
            image_url: "https://cdn.example.com/a.png".into(),
            target_url: "https://example.com".into(),
            placement: placement.map(String::from),
            active: true,
        }
    }

    #[test]
    fn branding_fields_validated_independently() {
        let b = validate_branding(BrandingInput {
            logo_url: None,
            primary_color: Some("#0a0b0c".into()),
            secondary_color: None,
        })
        .unwrap();
        assert_eq!(b.primary_color.as_deref(), Some("#0A0B0C"));
        assert!(b.logo_url.is_none());

        let err = validate_branding(BrandingInput {
            logo_url: Some("http://insecure.example.com/logo.png".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidUrl, _)));
    }

    #[test]
    fn ad_placement_defaults_and_normalizes() {
        assert_eq!(validate_ad(ad(None)).unwrap().placement, "BANNER");
        assert_eq!(validate_ad(ad(Some("sidebar"))).unwrap().placement, "SIDEBAR");
        assert!(validate_ad(ad(Some("popup"))).is_err());
        assert_eq!(validate_ad(ad(None)).unwrap().title, "Promo");
    }
}
