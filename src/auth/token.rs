use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::{AuthError, Claims, Identity};

/// Issues and verifies HS256 bearer tokens.
///
/// Both operations are pure CPU work. The secret is consumed at construction
/// and only the derived keys are kept.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity` with the deployment TTL.
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue_with_ttl(identity, self.ttl)
    }

    pub fn issue_with_ttl(&self, identity: &Identity, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user: identity.clone(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Check signature and expiry and return the identity claim.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.user)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::ExpiredOrInvalid
            })
    }
}
