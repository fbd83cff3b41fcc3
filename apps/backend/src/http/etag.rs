//! ETag / If-Match helpers for league settings.
//!
//! A league's ETag is `"league-{id}-v{lock_version}"`. Writes that must not
//! clobber concurrent edits require `If-Match` with the current tag.

use actix_web::http::header::IF_MATCH;
use actix_web::HttpRequest;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub fn league_etag(id: i64, version: i32) -> String {
    format!(r#""league-{id}-v{version}""#)
}

/// Lock version carried by an ETag for league `id`. Weak tags are accepted.
pub fn parse_league_version(raw: &str, id: i64) -> Result<i32, AppError> {
    let tag = raw.trim().trim_start_matches("W/").trim_matches('"');
    let prefix = format!("league-{id}-v");

    let version = tag.strip_prefix(&prefix).ok_or_else(|| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("ETag does not belong to league {id}: \"{tag}\""),
        )
    })?;
    version.parse::<i32>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("ETag version must be an integer, got \"{version}\""),
        )
    })
}

/// Expected lock version from `If-Match`; 428 when the header is absent.
pub fn require_if_match(req: &HttpRequest, id: i64) -> Result<i32, AppError> {
    let header = req
        .headers()
        .get(IF_MATCH)
        .ok_or_else(|| AppError::precondition_required("If-Match header is required"))?;
    let raw = header.to_str().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidHeader, "If-Match must be ASCII")
    })?;
    parse_league_version(raw, id)
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn format() {
        assert_eq!(league_etag(12, 0), r#""league-12-v0""#);
    }

    #[test]
    fn parses_strong_and_weak_tags() {
        assert_eq!(parse_league_version(r#""league-7-v3""#, 7).unwrap(), 3);
        assert_eq!(parse_league_version(r#"W/"league-7-v4""#, 7).unwrap(), 4);
        assert_eq!(parse_league_version("league-7-v5", 7).unwrap(), 5);
    }

    #[test]
    fn rejects_other_league_or_garbage() {
        assert!(parse_league_version(r#""league-8-v3""#, 7).is_err());
        assert!(parse_league_version(r#""league-7-vX""#, 7).is_err());
        assert!(parse_league_version("*", 7).is_err());
    }

    #[test]
    fn missing_if_match_is_428() {
        let req = TestRequest::default().to_http_request();
        let err = require_if_match(&req, 1).unwrap_err();
        assert_eq!(err.status().as_u16(), 428);
    }

    #[test]
    fn if_match_header_is_read() {
        let req = TestRequest::default()
            .insert_header((IF_MATCH, league_etag(9, 2)))
            .to_http_request();
        assert_eq!(require_if_match(&req, 9).unwrap(), 2);
    }
}
