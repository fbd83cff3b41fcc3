use std::env;

use jsonwebtoken::Algorithm;

use crate::error::AppError;

/// JWT signing settings.
#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Reads `BACKEND_JWT_SECRET`; startup fails without it.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = env::var("BACKEND_JWT_SECRET")
            .map_err(|_| AppError::config("BACKEND_JWT_SECRET must be set"))?;
        if secret.trim().is_empty() {
            return Err(AppError::config("BACKEND_JWT_SECRET must not be empty"));
        }
        Ok(Self::new(secret.into_bytes()))
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"***")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn debug_hides_secret() {
        let cfg = SecurityConfig::new("super-secret");
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }

    #[test]
    #[serial]
    fn from_env_requires_secret() {
        env::remove_var("BACKEND_JWT_SECRET");
        assert!(SecurityConfig::from_env().is_err());
        env::set_var("BACKEND_JWT_SECRET", "s3cret");
        let cfg = SecurityConfig::from_env().expect("secret set");
        env::remove_var("BACKEND_JWT_SECRET");
        assert_eq!(cfg.jwt_secret, b"s3cret".to_vec());
    }
}
