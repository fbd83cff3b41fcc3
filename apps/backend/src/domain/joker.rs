//! One joker per membership and joker phase.

use time::OffsetDateTime;

use crate::errors::domain::{DomainError, ValidationKind};

/// The prediction currently holding the joker in a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JokerHolder {
    pub prediction_id: i64,
    pub match_id: i64,
    pub locks_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokerPlan {
    /// Requested match already holds it.
    Keep,
    Place,
    /// Clear the joker on `from_prediction`, then place it.
    Move { from_prediction: i64 },
}

/// Decide how to put the joker on `match_id`.
pub fn plan_joker(
    match_id: i64,
    existing: Option<&JokerHolder>,
    now: OffsetDateTime,
) -> Result<JokerPlan, DomainError> {
    match existing {
        None => Ok(JokerPlan::Place),
        Some(holder) if holder.match_id == match_id => Ok(JokerPlan::Keep),
        Some(holder) if now >= holder.locks_at => Err(DomainError::validation(
            ValidationKind::JokerAlreadyUsed,
            format!(
                "Joker for this phase is already played on match {}",
                holder.match_id
            ),
        )),
        Some(holder) => Ok(JokerPlan::Move {
            from_prediction: holder.prediction_id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    const NOW: OffsetDateTime = datetime!(2026-06-15 12:00 UTC);

    fn holder(match_id: i64, locks_at: OffsetDateTime) -> JokerHolder {
        JokerHolder {
            prediction_id: 900 + match_id,
            match_id,
            locks_at,
        }
    }

    #[test]
    fn first_joker_is_placed() {
        assert_eq!(plan_joker(7, None, NOW), Ok(JokerPlan::Place));
    }

    #[test]
    fn same_match_keeps_it() {
        let h = holder(7, datetime!(2026-06-10 12:00 UTC));
        assert_eq!(plan_joker(7, Some(&h), NOW), Ok(JokerPlan::Keep));
    }

    #[test]
    fn unlocked_holder_moves() {
        let h = holder(3, datetime!(2026-06-16 18:00 UTC));
        assert_eq!(
            plan_joker(7, Some(&h), NOW),
            Ok(JokerPlan::Move {
                from_prediction: 903
            })
        );
    }

    #[test]
    fn locked_holder_blocks() {
        let h = holder(3, datetime!(2026-06-15 12:00 UTC));
        let err = plan_joker(7, Some(&h), NOW).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::JokerAlreadyUsed, _)
        ));
    }
}
