use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::JwtConfig;

/// JWT payload asserting an account id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // account ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    Invalid,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingRequiredClaim(_) => TokenError::Invalid,
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and verifies HS256 tokens with the shared signing secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(cfg: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&cfg.audience));
        validation.set_issuer(std::slice::from_ref(&cfg.issuer));
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: cfg.ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.issue_at(user_id, OffsetDateTime::now_utc())
    }

    /// Signs a token as if issued at `now`.
    pub fn issue_at(&self, user_id: Uuid, now: OffsetDateTime) -> anyhow::Result<String> {
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_service(secret: &str, issuer: &str, audience: &str) -> TokenService {
        TokenService::new(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl: Duration::from_secs(24 * 60 * 60),
        })
    }

    #[test]
    fn issue_and_verify() {
        let tokens = make_service("dev-secret", "test-issuer", "test-aud");
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).expect("issue");
        let claims = tokens.verify(&token).expect("verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn token_inside_lifetime_verifies() {
        let tokens = make_service("dev-secret", "iss", "aud");
        let user_id = Uuid::new_v4();
        let issued = OffsetDateTime::now_utc() - TimeDuration::hours(23);
        let token = tokens.issue_at(user_id, issued).expect("issue");
        assert_eq!(tokens.verify(&token).expect("verify").sub, user_id);
    }

    #[test]
    fn token_past_expiry_fails() {
        let tokens = make_service("dev-secret", "iss", "aud");
        let issued = OffsetDateTime::now_utc() - TimeDuration::hours(25);
        let token = tokens.issue_at(Uuid::new_v4(), issued).expect("issue");
        assert_eq!(tokens.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let good = make_service("secret-a", "iss", "aud");
        let bad = make_service("secret-b", "iss", "aud");
        let token = good.issue(Uuid::new_v4()).expect("issue");
        assert_eq!(bad.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn wrong_issuer_or_audience_is_invalid() {
        let good = make_service("same-secret", "good-iss", "good-aud");
        let bad = make_service("same-secret", "bad-iss", "bad-aud");
        let token = good.issue(Uuid::new_v4()).expect("issue");
        assert_eq!(bad.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = make_service("dev-secret", "iss", "aud");
        assert_eq!(tokens.verify("not-a-jwt").unwrap_err(), TokenError::Malformed);
        assert_eq!(tokens.verify("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn truncated_token_fails() {
        let tokens = make_service("dev-secret", "iss", "aud");
        let token = tokens.issue(Uuid::new_v4()).expect("issue");
        assert!(tokens.verify(&token[..token.len() - 1]).is_err());
    }
}
