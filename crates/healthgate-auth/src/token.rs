//! Session-token issue and verification.
//!
//! HS256 JWTs carrying `{ sub, role, iat, exp }`. Tokens are stateless —
//! expiry is the only revocation mechanism.

use crate::error::{AuthError, AuthResult};
use chrono::{Duration, Utc};
use healthgate_types::{Claims, Role};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Signs and verifies session tokens with a shared secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_hours: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_hours,
        }
    }

    /// Issue a token for `subject` with the configured expiry horizon.
    pub fn issue(&self, subject: &str, role: Role) -> AuthResult<String> {
        self.issue_with_ttl_seconds(subject, role, self.ttl_hours * 3600)
    }

    /// Issue a token with an explicit TTL in seconds.
    pub fn issue_with_ttl_seconds(
        &self,
        subject: &str,
        role: Role,
        ttl_seconds: i64,
    ) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Decode and verify a token; fails on signature mismatch or expiry.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_claims() {
        let tokens = TokenService::new("test-secret-at-least-32-characters", 24);
        let token = tokens.issue("P1", Role::Patient).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "P1");
        assert_eq!(claims.role, Role::Patient);
        assert!(claims.exp - claims.iat == 24 * 3600);
    }

    #[test]
    fn expired_token_fails_verification() {
        let tokens = TokenService::new("test-secret-at-least-32-characters", 24);
        // Far enough in the past to clear the default validation leeway.
        let token = tokens
            .issue_with_ttl_seconds("P1", Role::Patient, -300)
            .unwrap();

        let err = tokens.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let issuer = TokenService::new("secret-one-aaaaaaaaaaaaaaaaaaaaaaa", 24);
        let verifier = TokenService::new("secret-two-bbbbbbbbbbbbbbbbbbbbbbb", 24);
        let token = issuer.issue("D1", Role::Doctor).unwrap();

        assert!(matches!(
            verifier.verify(&token).unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }
}
