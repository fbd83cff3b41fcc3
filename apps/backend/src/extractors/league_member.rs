use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use super::app_state;
use super::current_user::{resolve_current_user, CurrentUser};
use super::league_id::parse_league_id;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ForbiddenKind};
use crate::repos::leagues;
use crate::repos::members::{self, Membership};

/// Caller's membership in the `{league_id}` league.
///
/// 404 when the league doesn't exist, 403 `NOT_A_MEMBER` when the caller
/// isn't in it. Role checks are left to the services.
#[derive(Debug, Clone)]
pub struct LeagueMember {
    pub user: CurrentUser,
    pub membership: Membership,
}

async fn lookup<C: sea_orm::ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    user_id: i64,
) -> Result<Membership, DomainError> {
    leagues::require_league(conn, league_id).await?;
    members::find_membership(conn, league_id, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::forbidden(
                ForbiddenKind::NotAMember,
                format!("Not a member of league {league_id}"),
            )
        })
}

async fn resolve(req: HttpRequest) -> Result<LeagueMember, AppError> {
    let league_id = parse_league_id(&req)?;
    let user = resolve_current_user(&req).await?;

    let membership = if let Some(shared) = SharedTxn::from_req(&req) {
        lookup(shared.transaction(), league_id, user.id).await?
    } else {
        let state = app_state(&req)?;
        lookup(require_db(&state)?, league_id, user.id).await?
    };

    Ok(LeagueMember { user, membership })
}

impl FromRequest for LeagueMember {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        Box::pin(resolve(req.clone()))
    }
}
