//! Site-admin allowlist loaded from `ADMIN_EMAILS`.
//!
//! Users whose email matches get `is_admin` set on login. Patterns are exact
//! addresses or `*@domain` wildcards.

use std::env;

use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Default)]
pub struct AdminEmails {
    exact: Vec<String>,
    domains: Vec<String>,
}

impl AdminEmails {
    /// Empty allowlist when the variable is unset or blank.
    pub fn from_env() -> Self {
        env::var("ADMIN_EMAILS")
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    pub fn parse(raw: &str) -> Self {
        let mut list = Self::default();
        for entry in raw.split(',').map(normalize_email).filter(|s| !s.is_empty()) {
            match entry.strip_prefix("*@") {
                Some(domain) if !domain.is_empty() => list.domains.push(domain.to_string()),
                Some(_) => {}
                None => list.exact.push(entry),
            }
        }
        list
    }

    pub fn is_admin(&self, email: &str) -> bool {
        let email = normalize_email(email);
        if self.exact.iter().any(|e| *e == email) {
            return true;
        }
        match email.rsplit_once('@') {
            Some((_, domain)) => self.domains.iter().any(|d| d == domain),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.domains.is_empty()
    }
}

/// Trim, NFKC-normalize and lowercase. Users are stored under the same form.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}
