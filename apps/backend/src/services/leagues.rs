//! League lifecycle: creation, membership, roles, join codes and plans.

use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::domain::plans::{LeagueKind, LeaguePlan};
use crate::domain::roles::LeagueRole;
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, NotFoundKind, ValidationKind,
};
use crate::repos::leagues::{self, League, NewLeague};
use crate::repos::members::{self, Membership};
use crate::repos::tournaments;
use crate::utils::join_code::{generate_join_code, normalize_join_code};

pub const MAX_NAME_CHARS: usize = 80;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
const JOIN_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
pub struct CreateLeague {
    pub tournament_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub plan: LeaguePlan,
}

/// Outcome of a join request.
#[derive(Debug, Clone)]
pub struct Joined {
    pub league: League,
    pub membership: Membership,
    /// `false` when the user was already a member.
    pub created: bool,
}

pub fn validate_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            format!("Name must be 1-{MAX_NAME_CHARS} characters"),
        ));
    }
    Ok(name.to_string())
}

fn validate_description(raw: Option<String>) -> Result<Option<String>, DomainError> {
    let description = raw.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    if description
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_CHARS)
    {
        return Err(DomainError::validation_other(format!(
            "Description is limited to {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(description)
}

/// A join code no league holds yet.
async fn fresh_join_code<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<String, DomainError> {
    for _ in 0..JOIN_CODE_ATTEMPTS {
        let code = generate_join_code();
        if leagues::find_by_join_code(conn, &code).await?.is_none() {
            return Ok(code);
        }
        warn!("Join code collision, retrying");
    }
    Err(DomainError::conflict(
        ConflictKind::JoinCodeConflict,
        "Could not allocate a unique join code",
    ))
}

/// League domain service.
pub struct LeagueService;

impl LeagueService {
    pub fn new() -> Self {
        Self
    }

    /// Create a league with the caller as OWNER.
    pub async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner_id: i64,
        req: CreateLeague,
    ) -> Result<(League, Membership), DomainError> {
        let name = validate_name(&req.name)?;
        let description = validate_description(req.description)?;
        tournaments::require_tournament(conn, req.tournament_id).await?;

        let join_code = fresh_join_code(conn).await?;
        let league = leagues::create_league(
            conn,
            NewLeague {
                tournament_id: req.tournament_id,
                owner_id,
                name,
                description,
                plan: req.plan,
                join_code,
            },
        )
        .await?;
        let membership =
            members::create_membership(conn, league.id, owner_id, LeagueRole::Owner).await?;

        info!(
            league_id = league.id,
            owner_id,
            kind = %league.plan.kind(),
            "League created"
        );
        Ok((league, membership))
    }

    /// Leagues the user belongs to, each with the user's membership.
    pub async fn list_mine<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Vec<(League, Membership)>, DomainError> {
        let mut out = Vec::new();
        for league in leagues::list_for_user(conn, user_id).await? {
            let membership = members::require_membership(conn, league.id, user_id).await?;
            out.push((league, membership));
        }
        Ok(out)
    }

    pub async fn update_details<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        expected_lock_version: i32,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<League, DomainError> {
        actor.role.require(LeagueRole::Admin)?;
        let name = name.as_deref().map(validate_name).transpose()?;
        let description = description.map(validate_description).transpose()?;
        leagues::update_details(
            conn,
            actor.league_id,
            expected_lock_version,
            name,
            description,
        )
        .await
    }

    /// Join by code. Re-joining returns the existing membership.
    pub async fn join<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        raw_code: &str,
    ) -> Result<Joined, DomainError> {
        let code = normalize_join_code(raw_code)?;
        let found = leagues::find_by_join_code(conn, &code).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::League, "No league matches that join code")
        })?;
        // Held until commit so concurrent joins see each other's rows in the count.
        let league = leagues::lock_league(conn, found.id).await?;

        if let Some(membership) = members::find_membership(conn, league.id, user_id).await? {
            return Ok(Joined {
                league,
                membership,
                created: false,
            });
        }

        let count = members::count_members(conn, league.id).await?;
        if !league.plan.features().has_room_for_one_more(count) {
            return Err(DomainError::validation(
                ValidationKind::MemberCapReached,
                format!("League is full ({count} members)"),
            ));
        }

        let membership =
            members::create_membership(conn, league.id, user_id, LeagueRole::Member).await?;
        info!(league_id = league.id, user_id, "Member joined league");
        Ok(Joined {
            league,
            membership,
            created: true,
        })
    }

    pub async fn leave<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
    ) -> Result<(), DomainError> {
        if actor.role == LeagueRole::Owner {
            return Err(DomainError::validation(
                ValidationKind::OwnerCannotLeave,
                "The owner cannot leave their league",
            ));
        }
        members::delete_membership(conn, actor.id).await?;
        info!(league_id = actor.league_id, user_id = actor.user_id, "Member left league");
        Ok(())
    }

    /// ADMIN+ removes a member. Admins can only remove plain members.
    pub async fn remove_member<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        target_user_id: i64,
    ) -> Result<(), DomainError> {
        actor.role.require(LeagueRole::Admin)?;
        let target = members::require_membership(conn, actor.league_id, target_user_id).await?;
        if target.role == LeagueRole::Owner {
            return Err(DomainError::validation(
                ValidationKind::OwnerCannotLeave,
                "The owner cannot be removed",
            ));
        }
        if target.role == LeagueRole::Admin && actor.role != LeagueRole::Owner {
            return Err(DomainError::forbidden(
                ForbiddenKind::InsufficientRole,
                "Only the owner can remove an admin",
            ));
        }
        members::delete_membership(conn, target.id).await?;
        info!(
            league_id = actor.league_id,
            removed_user_id = target_user_id,
            by_user_id = actor.user_id,
            "Member removed"
        );
        Ok(())
    }

    /// OWNER promotes or demotes a member between ADMIN and MEMBER.
    pub async fn set_role<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        target_user_id: i64,
        role: LeagueRole,
    ) -> Result<Membership, DomainError> {
        actor.role.require(LeagueRole::Owner)?;
        if role == LeagueRole::Owner {
            return Err(DomainError::validation(
                ValidationKind::InvalidRole,
                "Ownership cannot be assigned",
            ));
        }
        let target = members::require_membership(conn, actor.league_id, target_user_id).await?;
        if target.role == LeagueRole::Owner {
            return Err(DomainError::validation(
                ValidationKind::InvalidRole,
                "The owner's role cannot change",
            ));
        }
        members::update_role(conn, target.id, role).await?;
        Ok(Membership { role, ..target })
    }

    pub async fn regenerate_join_code<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
    ) -> Result<League, DomainError> {
        actor.role.require(LeagueRole::Admin)?;
        let code = fresh_join_code(conn).await?;
        let league = leagues::set_join_code(conn, actor.league_id, code).await?;
        info!(league_id = league.id, "Join code regenerated");
        Ok(league)
    }

    /// OWNER changes tier within the league's kind. Caps below the current
    /// member count are refused.
    pub async fn change_plan<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: &Membership,
        plan: LeaguePlan,
    ) -> Result<League, DomainError> {
        actor.role.require(LeagueRole::Owner)?;
        let league = leagues::require_league(conn, actor.league_id).await?;
        if plan.kind() != league.plan.kind() {
            let kind = match league.plan.kind() {
                LeagueKind::Social => "a social plan",
                LeagueKind::Enterprise => "an enterprise tier",
            };
            return Err(DomainError::validation(
                ValidationKind::InvalidPlan,
                format!("This league takes {kind}"),
            ));
        }
        let count = members::count_members(conn, league.id).await?;
        if !plan.features().fits(count) {
            return Err(DomainError::validation(
                ValidationKind::PlanDowngradeBlocked,
                format!("The league has {count} members, more than the new plan allows"),
            ));
        }
        let updated = leagues::set_plan(conn, league.id, plan).await?;
        info!(league_id = updated.id, plan = ?plan, "League plan changed");
        Ok(updated)
    }
}

impl Default for LeagueService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(validate_name("  Oficina  ").unwrap(), "Oficina");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_CHARS + 1)).is_err());
        assert!(validate_name(&"ñ".repeat(MAX_NAME_CHARS)).is_ok());
    }

    #[test]
    fn blank_descriptions_become_none() {
        assert_eq!(validate_description(Some("  ".into())).unwrap(), None);
        assert_eq!(
            validate_description(Some(" hola ".into())).unwrap().as_deref(),
            Some("hola")
        );
        assert!(validate_description(Some("x".repeat(MAX_DESCRIPTION_CHARS + 1))).is_err());
    }
}
