use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Verifies the HS256 bearer tokens minted by the login frontend.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (Google account id)
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    /// Extra roles granted by the issuer, e.g. `ROLE_ADMIN`
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl AccessTokenClaims {
    /// Claims describing `user`, valid for `ttl` from now.
    pub fn for_user(user: &User, roles: Vec<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user.google_sub.clone(),
            email: user.email.clone(),
            name: user.full_name.clone(),
            given_name: Some(user.given_name.clone()),
            family_name: Some(user.family_name.clone()),
            picture: Some(user.picture_url.clone()),
            email_verified: user.email_verified,
            roles,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

impl JwtService {
    pub fn new(secret: &Secret<String>) -> Result<Self, anyhow::Error> {
        let secret = secret.expose_secret();
        if secret.is_empty() {
            return Err(anyhow::anyhow!("JWT secret must not be empty"));
        }

        tracing::info!("JWT service initialized with HS256 secret");

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Validate and decode an access token
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid access token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Sign claims. Used by tests and local tooling; production tokens come
    /// from the login frontend.
    pub fn issue_access_token(&self, claims: &AccessTokenClaims) -> Result<String, anyhow::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            email: "cgaucho@ucsb.edu".to_string(),
            google_sub: "115856948234298493496".to_string(),
            full_name: "Chris Gaucho".to_string(),
            given_name: "Chris".to_string(),
            family_name: "Gaucho".to_string(),
            picture_url: String::new(),
            email_verified: true,
            admin: false,
        }
    }

    fn service(secret: &str) -> JwtService {
        JwtService::new(&Secret::new(secret.to_string())).unwrap()
    }

    #[test]
    fn rejects_empty_secret() {
        assert!(JwtService::new(&Secret::new(String::new())).is_err());
    }

    #[test]
    fn issued_token_validates() {
        let jwt = service("test-secret");
        let claims =
            AccessTokenClaims::for_user(&user(), vec!["ROLE_ADMIN".to_string()], Duration::minutes(5));

        let token = jwt.issue_access_token(&claims).unwrap();
        let decoded = jwt.validate_access_token(&token).unwrap();

        assert_eq!(decoded.email, "cgaucho@ucsb.edu");
        assert_eq!(decoded.roles, vec!["ROLE_ADMIN".to_string()]);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let claims = AccessTokenClaims::for_user(&user(), vec![], Duration::minutes(5));
        let token = service("one").issue_access_token(&claims).unwrap();

        assert!(service("two").validate_access_token(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let jwt = service("test-secret");
        let claims = AccessTokenClaims::for_user(&user(), vec![], Duration::hours(-1));
        let token = jwt.issue_access_token(&claims).unwrap();

        assert!(jwt.validate_access_token(&token).is_err());
    }
}
