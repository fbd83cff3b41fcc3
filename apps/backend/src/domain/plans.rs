//! League kinds, plan tiers and the features each tier unlocks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ForbiddenKind, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeagueKind {
    Social,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SocialPlan {
    Free,
    Plus,
    Pro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnterpriseTier {
    Bronze,
    Plata,
    Oro,
    Platino,
    Diamante,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaguePlan {
    Social(SocialPlan),
    Enterprise(EnterpriseTier),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Feature {
    Branding,
    SocialLinks,
    Departments,
    Ads,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanFeatures {
    /// `None` is unlimited.
    pub max_members: Option<u32>,
    pub custom_branding: bool,
    pub social_links: bool,
    pub departments: bool,
    pub ads: bool,
}

impl PlanFeatures {
    pub fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::Branding => self.custom_branding,
            Feature::SocialLinks => self.social_links,
            Feature::Departments => self.departments,
            Feature::Ads => self.ads,
        }
    }

    /// Whether a league with `members` can take one more.
    pub fn has_room_for_one_more(&self, members: u64) -> bool {
        self.max_members.is_none_or(|cap| members < u64::from(cap))
    }

    pub fn fits(&self, members: u64) -> bool {
        self.max_members.is_none_or(|cap| members <= u64::from(cap))
    }
}

const fn features(
    max_members: Option<u32>,
    custom_branding: bool,
    social_links: bool,
    departments: bool,
    ads: bool,
) -> PlanFeatures {
    PlanFeatures {
        max_members,
        custom_branding,
        social_links,
        departments,
        ads,
    }
}

impl LeaguePlan {
    pub fn kind(&self) -> LeagueKind {
        match self {
            LeaguePlan::Social(_) => LeagueKind::Social,
            LeaguePlan::Enterprise(_) => LeagueKind::Enterprise,
        }
    }

    pub fn features(&self) -> PlanFeatures {
        match self {
            LeaguePlan::Social(SocialPlan::Free) => features(Some(10), false, false, false, false),
            LeaguePlan::Social(SocialPlan::Plus) => features(Some(50), false, false, false, false),
            LeaguePlan::Social(SocialPlan::Pro) => features(Some(250), false, false, false, false),
            LeaguePlan::Enterprise(EnterpriseTier::Bronze) => {
                features(Some(25), false, false, false, false)
            }
            LeaguePlan::Enterprise(EnterpriseTier::Plata) => {
                features(Some(100), true, false, false, false)
            }
            LeaguePlan::Enterprise(EnterpriseTier::Oro) => {
                features(Some(300), true, true, false, false)
            }
            LeaguePlan::Enterprise(EnterpriseTier::Platino) => {
                features(Some(1000), true, true, true, false)
            }
            LeaguePlan::Enterprise(EnterpriseTier::Diamante) => {
                features(None, true, true, true, true)
            }
        }
    }

    /// Build from the columns stored on a league. The kind decides which of
    /// the two plan columns must be present.
    pub fn from_parts(
        kind: LeagueKind,
        social_plan: Option<&str>,
        enterprise_tier: Option<&str>,
    ) -> Result<Self, DomainError> {
        match (kind, social_plan, enterprise_tier) {
            (LeagueKind::Social, Some(p), None) => Ok(LeaguePlan::Social(p.parse()?)),
            (LeagueKind::Social, None, None) => Ok(LeaguePlan::Social(SocialPlan::Free)),
            (LeagueKind::Enterprise, None, Some(t)) => Ok(LeaguePlan::Enterprise(t.parse()?)),
            (LeagueKind::Enterprise, None, None) => {
                Ok(LeaguePlan::Enterprise(EnterpriseTier::Bronze))
            }
            _ => Err(DomainError::validation(
                ValidationKind::InvalidPlan,
                "Social leagues take a social_plan, enterprise leagues an enterprise_tier",
            )),
        }
    }

    pub fn social_plan(&self) -> Option<SocialPlan> {
        match self {
            LeaguePlan::Social(p) => Some(*p),
            LeaguePlan::Enterprise(_) => None,
        }
    }

    pub fn enterprise_tier(&self) -> Option<EnterpriseTier> {
        match self {
            LeaguePlan::Enterprise(t) => Some(*t),
            LeaguePlan::Social(_) => None,
        }
    }
}

/// Forbidden unless the plan includes `feature`.
pub fn require_feature(features: &PlanFeatures, feature: Feature) -> Result<(), DomainError> {
    if features.allows(feature) {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            ForbiddenKind::FeatureNotAvailable,
            format!("This league's plan does not include {feature:?}"),
        ))
    }
}

macro_rules! string_enum {
    ($ty:ident, $label:literal, { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $ty {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $code),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($code => Ok($ty::$variant),)+
                    _ => Err(DomainError::validation(
                        ValidationKind::InvalidPlan,
                        format!("Unknown {} '{s}'", $label),
                    )),
                }
            }
        }
    };
}

string_enum!(LeagueKind, "league kind", { Social => "SOCIAL", Enterprise => "ENTERPRISE" });
string_enum!(SocialPlan, "social plan", { Free => "FREE", Plus => "PLUS", Pro => "PRO" });
string_enum!(EnterpriseTier, "enterprise tier", {
    Bronze => "BRONZE",
    Plata => "PLATA",
    Oro => "ORO",
    Platino => "PLATINO",
    Diamante => "DIAMANTE",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_caps() {
        let cap = |p: LeaguePlan| p.features().max_members;
        assert_eq!(cap(LeaguePlan::Social(SocialPlan::Free)), Some(10));
        assert_eq!(cap(LeaguePlan::Social(SocialPlan::Plus)), Some(50));
        assert_eq!(cap(LeaguePlan::Social(SocialPlan::Pro)), Some(250));
        assert_eq!(cap(LeaguePlan::Enterprise(EnterpriseTier::Bronze)), Some(25));
        assert_eq!(cap(LeaguePlan::Enterprise(EnterpriseTier::Plata)), Some(100));
        assert_eq!(cap(LeaguePlan::Enterprise(EnterpriseTier::Oro)), Some(300));
        assert_eq!(cap(LeaguePlan::Enterprise(EnterpriseTier::Platino)), Some(1000));
        assert_eq!(cap(LeaguePlan::Enterprise(EnterpriseTier::Diamante)), None);
    }

    #[test]
    fn tier_features_accumulate() {
        let f = |t| LeaguePlan::Enterprise(t).features();
        assert!(!f(EnterpriseTier::Bronze).allows(Feature::Branding));
        assert!(f(EnterpriseTier::Plata).allows(Feature::Branding));
        assert!(!f(EnterpriseTier::Plata).allows(Feature::SocialLinks));
        assert!(f(EnterpriseTier::Oro).allows(Feature::SocialLinks));
        assert!(!f(EnterpriseTier::Oro).allows(Feature::Departments));
        assert!(f(EnterpriseTier::Platino).allows(Feature::Departments));
        assert!(!f(EnterpriseTier::Platino).allows(Feature::Ads));
        assert!(f(EnterpriseTier::Diamante).allows(Feature::Ads));
    }

    #[test]
    fn social_plans_have_no_enterprise_features() {
        for plan in [SocialPlan::Free, SocialPlan::Plus, SocialPlan::Pro] {
            let err = require_feature(&LeaguePlan::Social(plan).features(), Feature::Branding)
                .unwrap_err();
            assert!(matches!(
                err,
                DomainError::Forbidden(ForbiddenKind::FeatureNotAvailable, _)
            ));
        }
    }

    #[test]
    fn room_checks() {
        let free = LeaguePlan::Social(SocialPlan::Free).features();
        assert!(free.has_room_for_one_more(9));
        assert!(!free.has_room_for_one_more(10));
        assert!(free.fits(10));
        assert!(!free.fits(11));
        let unlimited = LeaguePlan::Enterprise(EnterpriseTier::Diamante).features();
        assert!(unlimited.has_room_for_one_more(1_000_000));
    }

    #[test]
    fn from_parts_checks_kind() {
        assert_eq!(
            LeaguePlan::from_parts(LeagueKind::Social, Some("plus"), None),
            Ok(LeaguePlan::Social(SocialPlan::Plus))
        );
        assert_eq!(
            LeaguePlan::from_parts(LeagueKind::Enterprise, None, Some("ORO")),
            Ok(LeaguePlan::Enterprise(EnterpriseTier::Oro))
        );
        assert!(LeaguePlan::from_parts(LeagueKind::Social, None, Some("ORO")).is_err());
        assert!(LeaguePlan::from_parts(LeagueKind::Enterprise, None, Some("GOLD")).is_err());
        assert_eq!(
            LeaguePlan::from_parts(LeagueKind::Social, None, None),
            Ok(LeaguePlan::Social(SocialPlan::Free))
        );
    }
}
