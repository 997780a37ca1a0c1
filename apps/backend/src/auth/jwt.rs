use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::claims::Claims;
use crate::errors::domain::DomainError;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Payload of a backend-issued access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessClaims {
    /// User identifier, mirrored from the user id claim
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    #[serde(rename = "https://hasura.io/jwt/claims")]
    pub claims: Claims,
}

/// Mint an HS256 access token for `claims`, valid for `security.token_ttl`.
pub fn mint_access_token(
    claims: &Claims,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, DomainError> {
    security.validate()?;
    claims.validate()?;

    let sub = claims
        .user_id()
        .ok_or_else(|| DomainError::signing("claims carry no user id"))?
        .to_string();

    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| DomainError::signing("system clock is before the unix epoch"))?
        .as_secs();
    let iat = i64::try_from(iat)
        .map_err(|_| DomainError::signing("issue time does not fit a JWT timestamp"))?;
    let exp = i64::try_from(security.token_ttl.as_secs())
        .ok()
        .and_then(|ttl| iat.checked_add(ttl))
        .ok_or_else(|| DomainError::signing("token expiry overflows a JWT timestamp"))?;

    let payload = AccessClaims {
        sub,
        iat,
        exp,
        claims: claims.clone(),
    };

    encode(
        &Header::new(security.algorithm),
        &payload,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| DomainError::signing(format!("failed to encode JWT: {e}")))
}

/// Verify signature and expiry, returning the decoded payload.
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<AccessClaims, AppError> {
    // Default Validation already checks exp; pin algorithm to configured algorithm.
    let validation = Validation::new(security.algorithm);

    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })?;

    let access = data.claims;
    if access.claims.validate().is_err() || access.claims.user_id() != Some(access.sub.as_str()) {
        return Err(AppError::unauthorized_invalid_jwt());
    }
    Ok(access)
}

/// Process-wide token issuer holding the signing configuration.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    security: SecurityConfig,
}

impl TokenIssuer {
    pub fn new(security: SecurityConfig) -> Result<Self, DomainError> {
        security.validate()?;
        Ok(Self { security })
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, DomainError> {
        mint_access_token(claims, SystemTime::now(), &self.security)
    }

    pub fn verify(&self, token: &str) -> Result<AccessClaims, AppError> {
        verify_access_token(token, &self.security)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::auth::claims::USER_ID_CLAIM;
    use crate::errors::ErrorKind;
    use crate::state::security_config::MAX_TOKEN_TTL;

    fn security(secret: &str) -> SecurityConfig {
        SecurityConfig::new(secret.as_bytes())
    }

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let security = security("test_secret_key_for_testing_purposes_only");
        let claims = Claims::new(
            "user",
            vec!["user".to_string(), "editor".to_string()],
            BTreeMap::from([
                (USER_ID_CLAIM.to_string(), "user-7".to_string()),
                ("X-Hasura-Org-Id".to_string(), "org-1".to_string()),
            ]),
        )
        .unwrap();
        let now = SystemTime::now();

        let token = mint_access_token(&claims, now, &security).unwrap();
        let decoded = verify_access_token(&token, &security).unwrap();

        assert_eq!(decoded.claims, claims);
        assert_eq!(decoded.sub, "user-7");
        assert_eq!(
            decoded.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(decoded.exp, decoded.iat + 60 * 60);
    }

    #[test]
    fn test_expired_token() {
        let security = security("test_secret_key_for_testing_purposes_only");
        // Two hours ago, one-hour token: expired well past the default leeway
        let then = SystemTime::now() - Duration::from_secs(2 * 60 * 60);

        let token = mint_access_token(&Claims::for_user("u"), then, &security).unwrap();

        assert!(matches!(
            verify_access_token(&token, &security),
            Err(AppError::UnauthorizedExpiredJwt)
        ));
    }

    #[test]
    fn test_bad_signature() {
        let token = mint_access_token(
            &Claims::for_user("u"),
            SystemTime::now(),
            &security("secret-A-is-long-enough-for-hs256-signing"),
        )
        .unwrap();

        let result = verify_access_token(&token, &security("secret-B-is-long-enough-for-hs256-signing"));
        assert!(matches!(result, Err(AppError::UnauthorizedInvalidJwt)));
    }

    #[test]
    fn test_garbage_token() {
        let result = verify_access_token("not.a.jwt", &SecurityConfig::default());
        assert!(matches!(result, Err(AppError::UnauthorizedInvalidJwt)));
    }

    #[test]
    fn test_missing_secret_is_signing_error() {
        let err = TokenIssuer::new(SecurityConfig::new(Vec::new())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SigningError);

        let err = mint_access_token(
            &Claims::for_user("u"),
            SystemTime::now(),
            &SecurityConfig::new(Vec::new()),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SigningError);
    }

    #[test]
    fn test_oversized_ttl_is_refused() {
        let security = SecurityConfig::default().with_token_ttl(Duration::from_secs(u64::MAX));

        let err = TokenIssuer::new(security.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SigningError);

        let err = mint_access_token(&Claims::for_user("u"), SystemTime::now(), &security)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SigningError);
    }

    #[test]
    fn test_longest_allowed_ttl_mints_a_live_token() {
        let issuer = TokenIssuer::new(SecurityConfig::default().with_token_ttl(MAX_TOKEN_TTL))
            .unwrap();
        let access = issuer.verify(&issuer.issue(&Claims::for_user("u")).unwrap()).unwrap();
        assert_eq!(access.exp - access.iat, MAX_TOKEN_TTL.as_secs() as i64);
    }

    #[test]
    fn test_configured_ttl() {
        let issuer =
            TokenIssuer::new(SecurityConfig::default().with_token_ttl(Duration::from_secs(300)))
                .unwrap();
        let access = issuer.verify(&issuer.issue(&Claims::for_user("u")).unwrap()).unwrap();
        assert_eq!(access.exp - access.iat, 300);
    }
}
