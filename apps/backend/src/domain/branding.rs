//! Validation of enterprise branding inputs.

use std::collections::BTreeMap;
use std::str::FromStr;

use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

pub const MAX_URL_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialNetwork {
    Facebook,
    Instagram,
    X,
    Tiktok,
    Youtube,
    Linkedin,
    Whatsapp,
    Website,
}

impl FromStr for SocialNetwork {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Self::Facebook),
            "instagram" => Ok(Self::Instagram),
            "x" | "twitter" => Ok(Self::X),
            "tiktok" => Ok(Self::Tiktok),
            "youtube" => Ok(Self::Youtube),
            "linkedin" => Ok(Self::Linkedin),
            "whatsapp" => Ok(Self::Whatsapp),
            "website" => Ok(Self::Website),
            other => Err(DomainError::validation(
                ValidationKind::InvalidSocialNetwork,
                format!("Unsupported social network '{other}'"),
            )),
        }
    }
}

/// `#RRGGBB`, normalized to uppercase.
pub fn validate_hex_color(raw: &str) -> Result<String, DomainError> {
    let color = raw.trim();
    if regex_is_match!(r"^#[0-9A-Fa-f]{6}$", color) {
        Ok(color.to_ascii_uppercase())
    } else {
        Err(DomainError::validation(
            ValidationKind::InvalidColor,
            format!("Color must look like #RRGGBB, got '{raw}'"),
        ))
    }
}

/// Absolute https URL with a host and no whitespace.
pub fn validate_https_url(raw: &str) -> Result<String, DomainError> {
    let url = raw.trim();
    if url.len() <= MAX_URL_LEN && regex_is_match!(r"^https://[A-Za-z0-9.-]+(:\d+)?(/\S*)?$", url)
    {
        Ok(url.to_string())
    } else {
        Err(DomainError::validation(
            ValidationKind::InvalidUrl,
            "URL must be an https:// address",
        ))
    }
}

/// Validate every network name and URL, keyed by network.
pub fn validate_social_links(
    links: &BTreeMap<String, String>,
) -> Result<BTreeMap<SocialNetwork, String>, DomainError> {
    links
        .iter()
        .map(|(network, url)| Ok((network.parse()?, validate_https_url(url)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors() {
        assert_eq!(validate_hex_color("#00aa7f").unwrap(), "#00AA7F");
        for bad in ["00AA7F", "#00AA7", "#00AA7FF", "#GGGGGG", "red"] {
            assert!(validate_hex_color(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn urls_must_be_https() {
        assert!(validate_https_url("https://cdn.polla.app/logo.png").is_ok());
        assert!(validate_https_url("https://example.com").is_ok());
        assert!(validate_https_url("http://example.com/logo.png").is_err());
        assert!(validate_https_url("javascript:alert(1)").is_err());
        assert!(validate_https_url("https://exa mple.com").is_err());
        assert!(validate_https_url(&format!("https://a.com/{}", "x".repeat(600))).is_err());
    }

    #[test]
    fn social_links_limited_to_known_networks() {
        let mut links = BTreeMap::new();
        links.insert("Instagram".to_string(), "https://instagram.com/club".to_string());
        links.insert("twitter".to_string(), "https://x.com/club".to_string());
        let ok = validate_social_links(&links).unwrap();
        assert_eq!(ok.get(&SocialNetwork::X).map(String::as_str), Some("https://x.com/club"));

        links.insert("myspace".to_string(), "https://myspace.com/club".to_string());
        let err = validate_social_links(&links).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::InvalidSocialNetwork, _)
        ));
    }
}
