//! JWT verification against the Keycloak realm.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::{AuthResult, Claims};

/// Validates bearer tokens issued by the realm.
///
/// Keycloak signs access tokens with the realm's RSA key; production
/// deployments construct the verifier from the realm public key PEM.
/// The HMAC constructor exists for dev setups and tests. Everything past
/// this boundary treats the decoded claims as trusted.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    /// Creates a verifier from the realm's RSA public key PEM.
    pub fn from_rsa_pem(pem: &[u8], issuer: &str) -> AuthResult<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(pem)?;
        Ok(Self {
            decoding_key,
            validation: Self::validation(Algorithm::RS256, issuer),
        })
    }

    /// Creates a verifier for HMAC-signed tokens (dev mode and tests).
    pub fn from_hmac_secret(secret: &str, issuer: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Self::validation(Algorithm::HS256, issuer),
        }
    }

    fn validation(algorithm: Algorithm, issuer: &str) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }

    /// Validates a token and returns its claims.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthError;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-must-be-long-enough-for-security";
    const ISSUER: &str = "https://keycloak.example.com/realms/bookcycle";

    fn mint(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims() -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "alice@example.com".to_string(),
            name: Some("Alice".to_string()),
            preferred_username: None,
            iat: now,
            exp: now + 3600,
            iss: ISSUER.to_string(),
            roles: json!(["MEMBER"]),
        }
    }

    #[test]
    fn test_verify_round_trip() {
        let verifier = TokenVerifier::from_hmac_secret(SECRET, ISSUER);
        let claims = claims();
        let token = mint(&claims, SECRET);

        let decoded = verifier.verify(&token).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.email, claims.email);
        assert_eq!(decoded.role_names(), vec!["MEMBER"]);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let verifier = TokenVerifier::from_hmac_secret(SECRET, ISSUER);
        let token = mint(&claims(), "some-other-secret-also-long-enough");
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_issuer() {
        let verifier = TokenVerifier::from_hmac_secret(SECRET, ISSUER);
        let mut claims = claims();
        claims.iss = "https://keycloak.example.com/realms/other".to_string();
        assert!(verifier.verify(&mint(&claims, SECRET)).is_err());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let verifier = TokenVerifier::from_hmac_secret(SECRET, ISSUER);
        let mut claims = claims();
        claims.exp = chrono::Utc::now().timestamp() - 3600;
        let result = verifier.verify(&mint(&claims, SECRET));
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_verify_garbage_token() {
        let verifier = TokenVerifier::from_hmac_secret(SECRET, ISSUER);
        assert!(verifier.verify("not-a-jwt").is_err());
    }
}
