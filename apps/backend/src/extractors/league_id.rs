use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Positive `{league_id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeagueId(pub i64);

/// Positive integer path segment `name`; 400 `INVALID_PATH_PARAM` otherwise.
pub fn parse_path_id(req: &HttpRequest, name: &str) -> Result<i64, AppError> {
    let raw = req.match_info().get(name).ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidPathParam, format!("Missing {name} parameter"))
    })?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::bad_request(
            ErrorCode::InvalidPathParam,
            format!("Invalid {name}: {raw}"),
        )),
    }
}

pub(crate) fn parse_league_id(req: &HttpRequest) -> Result<i64, AppError> {
    parse_path_id(req, "league_id")
}

impl FromRequest for LeagueId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_league_id(req).map(LeagueId))
    }
}
