//! Placeholder codes used in knockout fixtures before teams are known.

use std::fmt;
use std::str::FromStr;

use crate::errors::domain::{DomainError, ValidationKind};

pub const FIRST_GROUP: char = 'A';
pub const LAST_GROUP: char = 'L';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotCode {
    /// `1A`
    GroupWinner(char),
    /// `2A`
    GroupRunnerUp(char),
    /// `3ABCDF`: a best third-placed team from one of these groups.
    BestThird(Vec<char>),
    /// `W73`
    MatchWinner(i32),
    /// `L101`
    MatchLoser(i32),
}

impl SlotCode {
    /// Match this slot is fed by, for `W`/`L` codes.
    pub fn source_match(&self) -> Option<i32> {
        match self {
            SlotCode::MatchWinner(n) | SlotCode::MatchLoser(n) => Some(*n),
            _ => None,
        }
    }

    /// Group whose final table decides this slot, for `1X`/`2X` codes.
    pub fn source_group(&self) -> Option<char> {
        match self {
            SlotCode::GroupWinner(g) | SlotCode::GroupRunnerUp(g) => Some(*g),
            _ => None,
        }
    }
}

fn invalid(code: &str, why: &str) -> DomainError {
    DomainError::validation(
        ValidationKind::InvalidSlotCode,
        format!("Invalid slot code '{code}': {why}"),
    )
}

fn group_letter(c: char, code: &str) -> Result<char, DomainError> {
    if (FIRST_GROUP..=LAST_GROUP).contains(&c) {
        Ok(c)
    } else {
        Err(invalid(
            code,
            &format!("group must be {FIRST_GROUP}..{LAST_GROUP}"),
        ))
    }
}

fn match_number(digits: &str, code: &str) -> Result<i32, DomainError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(code, "expected a match number"));
    }
    match digits.parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(code, "match number out of range")),
    }
}

impl FromStr for SlotCode {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let code = raw.trim().to_ascii_uppercase();
        let mut chars = code.chars();
        let Some(prefix) = chars.next() else {
            return Err(invalid(raw, "empty"));
        };
        let rest = chars.as_str();

        match prefix {
            '1' | '2' => {
                let mut it = rest.chars();
                let (Some(g), None) = (it.next(), it.next()) else {
                    return Err(invalid(raw, "expected a single group letter"));
                };
                let g = group_letter(g, raw)?;
                Ok(if prefix == '1' {
                    SlotCode::GroupWinner(g)
                } else {
                    SlotCode::GroupRunnerUp(g)
                })
            }
            '3' => {
                if rest.is_empty() {
                    return Err(invalid(raw, "third-place slot lists no groups"));
                }
                let mut groups = Vec::with_capacity(rest.len());
                for c in rest.chars() {
                    let g = group_letter(c, raw)?;
                    if groups.contains(&g) {
                        return Err(invalid(raw, "duplicate group"));
                    }
                    groups.push(g);
                }
                Ok(SlotCode::BestThird(groups))
            }
            'W' => Ok(SlotCode::MatchWinner(match_number(rest, raw)?)),
            'L' => Ok(SlotCode::MatchLoser(match_number(rest, raw)?)),
            _ => Err(invalid(raw, "unknown prefix")),
        }
    }
}

impl fmt::Display for SlotCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotCode::GroupWinner(g) => write!(f, "1{g}"),
            SlotCode::GroupRunnerUp(g) => write!(f, "2{g}"),
            SlotCode::BestThird(groups) => {
                f.write_str("3")?;
                groups.iter().try_for_each(|g| write!(f, "{g}"))
            }
            SlotCode::MatchWinner(n) => write!(f, "W{n}"),
            SlotCode::MatchLoser(n) => write!(f, "L{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_form() {
        assert_eq!("1A".parse::<SlotCode>(), Ok(SlotCode::GroupWinner('A')));
        assert_eq!("2l".parse::<SlotCode>(), Ok(SlotCode::GroupRunnerUp('L')));
        assert_eq!(
            "3ABCDF".parse::<SlotCode>(),
            Ok(SlotCode::BestThird(vec!['A', 'B', 'C', 'D', 'F']))
        );
        assert_eq!("W73".parse::<SlotCode>(), Ok(SlotCode::MatchWinner(73)));
        assert_eq!(" L101 ".parse::<SlotCode>(), Ok(SlotCode::MatchLoser(101)));
    }

    #[test]
    fn display_round_trips() {
        for raw in ["1A", "2K", "3CEFHI", "W89", "L101"] {
            let code: SlotCode = raw.parse().unwrap();
            assert_eq!(code.to_string(), raw);
        }
    }

    #[test]
    fn rejects_malformed_codes() {
        for raw in [
            "", "X1", "1", "1AB", "1M", "3", "3AA", "3AZ", "W", "W7a", "L-3", "W0",
            "W99999999999",
        ] {
            let err = raw.parse::<SlotCode>().unwrap_err();
            assert!(
                matches!(err, DomainError::Validation(ValidationKind::InvalidSlotCode, _)),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn sources() {
        assert_eq!(SlotCode::MatchLoser(101).source_match(), Some(101));
        assert_eq!(SlotCode::GroupWinner('C').source_group(), Some('C'));
        assert_eq!(SlotCode::BestThird(vec!['A']).source_group(), None);
    }
}
