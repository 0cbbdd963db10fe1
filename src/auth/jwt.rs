//! JWT Token Service
//!
//! Issues and verifies the HS256 session tokens carried in the `token`
//! cookie. Tokens are stateless: nothing is stored server-side.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

const ISSUER: &str = "cosmetics-catalog";

/// Lifetime of an issued token
pub const TOKEN_TTL_HOURS: i64 = 24;

/// JWT Claims structure containing user information and token metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username of the authenticated admin
    pub sub: String,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issuer
    pub iss: String,
}

/// JWT Service for token operations
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create a new JWT service with the provided secret
    pub fn new(secret: &str) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Generate a token for `username`, valid for 24 hours from now
    pub fn create_token(&self, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.create_token_at(username, Utc::now())
    }

    fn create_token_at(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expiration = issued_at + Duration::hours(TOKEN_TTL_HOURS);

        let claims = Claims {
            sub: username.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            iss: ISSUER.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate and decode a JWT token
    pub fn validate_token(
        &self,
        token: &str,
    ) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
    }

    /// Returns the username when the token is authentic and unexpired.
    /// The failure reason is logged at debug level only.
    pub fn verify_token(&self, token: &str) -> Option<String> {
        match self.validate_token(token) {
            // jsonwebtoken still accepts exp == now; a token is valid only while now < exp
            Ok(data) if data.claims.exp <= Utc::now().timestamp() => {
                tracing::debug!("Token rejected: expired at {}", data.claims.exp);
                None
            }
            Ok(data) => Some(data.claims.sub),
            Err(e) => {
                tracing::debug!("Token rejected: {:?}", e.kind());
                None
            }
        }
    }
}
