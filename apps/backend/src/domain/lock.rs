//! Prediction and bracket deadlines.

use time::{Duration, OffsetDateTime};

/// Moment predictions on a match stop being accepted.
pub fn lock_at(kickoff: OffsetDateTime, lock_minutes: i32) -> OffsetDateTime {
    kickoff - Duration::minutes(i64::from(lock_minutes.max(0)))
}

pub fn is_locked(kickoff: OffsetDateTime, lock_minutes: i32, now: OffsetDateTime) -> bool {
    now >= lock_at(kickoff, lock_minutes)
}

/// Earliest knockout kickoff minus the lock window. `None` without knockout matches.
pub fn bracket_deadline<I>(knockout_kickoffs: I, lock_minutes: i32) -> Option<OffsetDateTime>
where
    I: IntoIterator<Item = OffsetDateTime>,
{
    knockout_kickoffs
        .into_iter()
        .min()
        .map(|first| lock_at(first, lock_minutes))
}

pub fn is_bracket_locked(deadline: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
    deadline.is_some_and(|d| now >= d)
}
