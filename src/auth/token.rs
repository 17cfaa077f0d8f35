//! Session token issuance and validation
//!
//! Stateless HS256 JWTs: the server keeps no session table, so a token is
//! valid exactly while its signature verifies under the current signing
//! secret and its expiry has not elapsed. There is no server-side
//! revocation; logout only clears the client's carrier, and a rotated
//! secret invalidates every outstanding token.

use crate::core::config::AuthConfig;
use crate::core::error::{LiftlogError, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    /// Issued-at (unix seconds)
    pub iat: usize,
    /// Expiry (unix seconds)
    pub exp: usize,
}

/// Issues and validates session tokens
///
/// Built once at startup from the immutable auth configuration and shared
/// read-only across all requests.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
}

impl TokenIssuer {
    /// Create a token issuer from the auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_secs: config.token_ttl,
        }
    }

    /// Issue a signed, time-bound token for an account
    pub fn issue(&self, account_id: &str) -> Result<String> {
        let now = chrono::Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::seconds(self.ttl_secs as i64))
            .ok_or_else(|| {
                LiftlogError::AuthenticationError("Failed to calculate expiration".to_string())
            })?;

        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| LiftlogError::AuthenticationError(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and extract the account id it was issued for
    ///
    /// Every failure mode (bad signature, expired, malformed) collapses into
    /// the same Unauthenticated outcome so callers cannot distinguish them.
    pub fn validate(&self, token: &str) -> Result<String> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| {
                LiftlogError::AuthenticationError("Invalid or expired session token".to_string())
            })?;

        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            token_ttl: 3600,
            bcrypt_cost: 4,
        })
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let issuer = test_issuer("test-secret");
        let token = issuer.issue("account-1").unwrap();
        assert_eq!(issuer.validate(&token).unwrap(), "account-1");
    }

    #[test]
    fn test_forged_token_is_rejected() {
        let token = test_issuer("secret-a").issue("account-1").unwrap();
        let err = test_issuer("secret-b").validate(&token).unwrap_err();
        assert!(matches!(err, LiftlogError::AuthenticationError(_)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let issuer = test_issuer("test-secret");
        let mut token = issuer.issue("account-1").unwrap();
        token.push('x');
        assert!(issuer.validate(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let issuer = test_issuer("test-secret");
        assert!(issuer.validate("not.a.token").is_err());
        assert!(issuer.validate("").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issuer = test_issuer("test-secret");

        // Sign an already-expired set of claims with the issuer's secret
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "account-1".to_string(),
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = issuer.validate(&token).unwrap_err();
        assert!(matches!(err, LiftlogError::AuthenticationError(_)));
    }

    #[test]
    fn test_expired_and_forged_are_indistinguishable() {
        let issuer = test_issuer("test-secret");

        let forged = test_issuer("other-secret").issue("account-1").unwrap();
        let now = chrono::Utc::now().timestamp();
        let expired = encode(
            &Header::default(),
            &Claims {
                sub: "account-1".to_string(),
                iat: (now - 7200) as usize,
                exp: (now - 3600) as usize,
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let forged_msg = issuer.validate(&forged).unwrap_err().to_string();
        let expired_msg = issuer.validate(&expired).unwrap_err().to_string();
        assert_eq!(forged_msg, expired_msg);
    }

    #[test]
    fn test_multiple_tokens_per_account_coexist() {
        let issuer = test_issuer("test-secret");
        let first = issuer.issue("account-1").unwrap();
        let second = issuer.issue("account-1").unwrap();

        assert_eq!(issuer.validate(&first).unwrap(), "account-1");
        assert_eq!(issuer.validate(&second).unwrap(), "account-1");
    }
}
