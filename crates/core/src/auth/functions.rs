//! Pure claim checks, run around signature verification.

use chrono::{DateTime, Utc};

use super::{AuthError, Claims, VerifierConfig};

/// Checks that the token came from the configured pool and has the
/// configured use. Runs on the unverified payload, before key lookup.
pub fn check_origin(claims: &Claims, config: &VerifierConfig) -> Result<(), AuthError> {
    if claims.iss != config.issuer() {
        return Err(AuthError::WrongIssuer);
    }
    if claims.token_use != config.token_use.as_str() {
        return Err(AuthError::WrongTokenUse(config.token_use));
    }
    Ok(())
}

/// Rejects tokens issued longer ago than the configured expiration.
pub fn check_max_age(
    claims: &Claims,
    config: &VerifierConfig,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    let max_age = config.token_expiration.as_millis() as i64;
    let issued_at = claims.iat.saturating_mul(1000);
    if issued_at.saturating_add(max_age) < now.timestamp_millis() {
        return Err(AuthError::TokenTooOld);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenUse;
    use chrono::TimeZone;

    fn config() -> VerifierConfig {
        VerifierConfig::new("us-east-1", "us-east-1_pool", "access", None).unwrap()
    }

    fn claims(iat: i64) -> Claims {
        Claims {
            sub: "sub-1".to_string(),
            iss: config().issuer(),
            token_use: "access".to_string(),
            username: None,
            email: None,
            exp: iat + 3600,
            iat,
            client_id: None,
            scope: None,
        }
    }

    #[test]
    fn test_check_origin_accepts_matching_claims() {
        assert!(check_origin(&claims(0), &config()).is_ok());
    }

    #[test]
    fn test_check_origin_wrong_issuer_first() {
        let mut c = claims(0);
        c.iss = "https://elsewhere".to_string();
        c.token_use = "id".to_string();
        assert_eq!(check_origin(&c, &config()), Err(AuthError::WrongIssuer));
    }

    #[test]
    fn test_check_origin_wrong_use() {
        let mut c = claims(0);
        c.token_use = "id".to_string();
        assert_eq!(
            check_origin(&c, &config()),
            Err(AuthError::WrongTokenUse(TokenUse::Access))
        );
    }

    #[test]
    fn test_check_max_age_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let iat = now.timestamp() - 3600;

        assert!(check_max_age(&claims(iat), &config(), now).is_ok());
        assert_eq!(
            check_max_age(&claims(iat - 1), &config(), now),
            Err(AuthError::TokenTooOld)
        );
    }
}
