//! HS256 bearer credential verification.
//!
//! Credentials are issued by the storefront's login flow as JWTs signed with a
//! shared secret, carrying the user id in a `userId` claim and a mandatory
//! expiry. Only verification lives here; issuing is the auth service's job.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use ordercast_domain::{AuthError, PrincipalId};

use crate::infrastructure::ports::TokenVerifierPort;

/// Claims carried by a storefront credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialClaims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Expiry, seconds since the epoch
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

/// Verifies HS256 credentials against a shared secret.
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the issuer applies no clock tolerance either.
        validation.leeway = 0;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenVerifierPort for JwtTokenVerifier {
    fn verify(&self, credential: &str) -> Result<PrincipalId, AuthError> {
        match decode::<CredentialClaims>(credential.trim(), &self.key, &self.validation) {
            Ok(data) => Ok(PrincipalId::new(data.claims.user_id)),
            Err(e) => {
                tracing::debug!(error = %e, "Credential rejected");
                Err(AuthError::InvalidCredential)
            }
        }
    }
}

/// Sign a credential the way the storefront login does (tests only).
#[cfg(test)]
pub(crate) fn issue_token(secret: &str, user_id: i64, ttl_seconds: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp();
    let claims = CredentialClaims {
        user_id,
        exp: (now + ttl_seconds) as u64,
        iat: Some(now as u64),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
