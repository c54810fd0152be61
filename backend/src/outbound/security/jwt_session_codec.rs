//! HS256 JSON Web Token implementation of [`SessionTokenCodec`].
//!
//! Claims: `sub` (user id), `email`, `name`, `iat`, `exp`. Expiry is checked
//! against the injected clock with zero leeway rather than the library's
//! wall-clock check, so tests and production share one notion of "now".

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{SessionIdentity, SessionToken, SessionTokenCodec, SessionTokenError};
use crate::domain::{DisplayName, EmailAddress, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    email: String,
    name: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct JwtSessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtSessionCodec {
    /// Build a codec from the raw signing secret.
    ///
    /// The key material is copied into the `jsonwebtoken` keys; callers may
    /// wipe their copy afterwards.
    pub fn new(secret: &[u8], ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

fn identity_from_claims(claims: SessionClaims) -> Option<SessionIdentity> {
    let user_id = claims.sub.parse::<i64>().ok().and_then(|id| UserId::new(id).ok())?;
    Some(SessionIdentity {
        user_id,
        email: EmailAddress::new(claims.email).ok()?,
        display_name: DisplayName::new(claims.name).ok()?,
    })
}

fn expiry(exp: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(exp, 0)
}

impl SessionTokenCodec for JwtSessionCodec {
    fn issue(&self, identity: &SessionIdentity) -> Result<SessionToken, SessionTokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let claims = SessionClaims {
            sub: identity.user_id.to_string(),
            email: identity.email.as_ref().to_owned(),
            name: identity.display_name.as_ref().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let value = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| SessionTokenError::signing(err.to_string()))?;
        let expires_at = expiry(claims.exp)
            .ok_or_else(|| SessionTokenError::signing("expiry out of range"))?;
        Ok(SessionToken { value, expires_at })
    }

    fn verify(&self, token: &str) -> Result<SessionIdentity, SessionTokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| {
                debug!(error = %err, "session token rejected");
                SessionTokenError::verification_failed()
            })?;
        if self.clock.utc().timestamp() >= data.claims.exp {
            debug!("session token expired");
            return Err(SessionTokenError::verification_failed());
        }
        identity_from_claims(data.claims).ok_or_else(SessionTokenError::verification_failed)
    }
}
