//! League join codes: 8 characters of Crockford base32.

use rand::Rng;

use crate::errors::domain::{DomainError, ValidationKind};

pub const JOIN_CODE_LEN: usize = 8;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

/// Random join code from the thread-local CSPRNG.
pub fn generate_join_code() -> String {
    let mut rng = rand::rng();
    (0..JOIN_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}

/// Canonical form of a user-typed code.
///
/// Whitespace and hyphens are dropped, letters uppercased, and the Crockford
/// look-alikes folded (`O` to `0`, `I`/`L` to `1`).
pub fn normalize_join_code(raw: &str) -> Result<String, DomainError> {
    let code: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| match c.to_ascii_uppercase() {
            'O' => '0',
            'I' | 'L' => '1',
            other => other,
        })
        .collect();

    if code.len() == JOIN_CODE_LEN && code.bytes().all(|b| CROCKFORD.contains(&b)) {
        Ok(code)
    } else {
        Err(DomainError::validation(
            ValidationKind::InvalidJoinCode,
            format!("Join codes are {JOIN_CODE_LEN} characters of 0-9 and A-Z"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_canonical() {
        for _ in 0..50 {
            let code = generate_join_code();
            assert_eq!(code.len(), JOIN_CODE_LEN);
            assert_eq!(normalize_join_code(&code).as_deref(), Ok(code.as_str()));
        }
    }

    #[test]
    fn two_codes_differ() {
        assert_ne!(generate_join_code(), generate_join_code());
    }

    #[test]
    fn normalization_is_forgiving() {
        assert_eq!(normalize_join_code("  ab12-cd34 ").unwrap(), "AB12CD34");
        assert_eq!(normalize_join_code("oil0AAAA").unwrap(), "0110AAAA");
    }

    #[test]
    fn rejects_wrong_length_or_alphabet() {
        assert!(normalize_join_code("ABC").is_err());
        assert!(normalize_join_code("ABCDEFGHJ").is_err());
        assert!(normalize_join_code("ABCD#FGH").is_err());
        assert!(normalize_join_code("ABCDEFGU").is_err());
    }
}
