use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// Tournament stage of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "GROUP")]
    Group,
    #[serde(rename = "R32")]
    RoundOf32,
    #[serde(rename = "R16")]
    RoundOf16,
    #[serde(rename = "QF")]
    QuarterFinal,
    #[serde(rename = "SF")]
    SemiFinal,
    #[serde(rename = "THIRD")]
    ThirdPlace,
    #[serde(rename = "FINAL")]
    Final,
}

/// Window in which a member may spend one joker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JokerPhase {
    Group,
    RoundOf32,
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Group,
        Stage::RoundOf32,
        Stage::RoundOf16,
        Stage::QuarterFinal,
        Stage::SemiFinal,
        Stage::ThirdPlace,
        Stage::Final,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Stage::Group => "GROUP",
            Stage::RoundOf32 => "R32",
            Stage::RoundOf16 => "R16",
            Stage::QuarterFinal => "QF",
            Stage::SemiFinal => "SF",
            Stage::ThirdPlace => "THIRD",
            Stage::Final => "FINAL",
        }
    }

    pub const fn is_knockout(&self) -> bool {
        !matches!(self, Stage::Group)
    }

    /// The third-place match shares the final's joker.
    pub const fn joker_phase(&self) -> JokerPhase {
        match self {
            Stage::Group => JokerPhase::Group,
            Stage::RoundOf32 => JokerPhase::RoundOf32,
            Stage::RoundOf16 => JokerPhase::RoundOf16,
            Stage::QuarterFinal => JokerPhase::QuarterFinal,
            Stage::SemiFinal => JokerPhase::SemiFinal,
            Stage::ThirdPlace | Stage::Final => JokerPhase::Final,
        }
    }

    /// Stages that belong to `phase`.
    pub fn in_joker_phase(phase: JokerPhase) -> impl Iterator<Item = Stage> {
        Stage::ALL
            .into_iter()
            .filter(move |s| s.joker_phase() == phase)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DomainError::validation(ValidationKind::InvalidStage, format!("Unknown stage '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>(), Ok(stage));
        }
        assert_eq!("qf".parse::<Stage>(), Ok(Stage::QuarterFinal));
    }

    #[test]
    fn unknown_stage_is_rejected() {
        let err = "R64".parse::<Stage>().unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::InvalidStage, _)
        ));
    }

    #[test]
    fn third_place_shares_final_joker() {
        assert_eq!(Stage::ThirdPlace.joker_phase(), JokerPhase::Final);
        assert_eq!(Stage::Final.joker_phase(), JokerPhase::Final);
        let final_stages: Vec<_> = Stage::in_joker_phase(JokerPhase::Final).collect();
        assert_eq!(final_stages, vec![Stage::ThirdPlace, Stage::Final]);
    }

    #[test]
    fn only_group_is_not_knockout() {
        let knockout: Vec<_> = Stage::ALL.into_iter().filter(Stage::is_knockout).collect();
        assert_eq!(knockout.len(), 6);
        assert!(!Stage::Group.is_knockout());
    }

    #[test]
    fn serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Stage::RoundOf16).unwrap(), "\"R16\"");
        let s: Stage = serde_json::from_str("\"THIRD\"").unwrap();
        assert_eq!(s, Stage::ThirdPlace);
    }
}
