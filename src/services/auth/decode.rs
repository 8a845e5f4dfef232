use std::{error::Error as StdError, fmt};

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

// Errors returned by local access-token decoding.
#[derive(Debug)]
pub enum DecodeError {
    Jwt(jsonwebtoken::errors::Error),
    EmptyClaim(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
        }
    }
}

impl StdError for DecodeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Claims read from a Keycloak access token.
///
/// `aud` is not modelled: Keycloak puts `account` (or nothing) there for most
/// clients, so the audience is not a useful check for this gate.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// RS256 verifier for tokens issued by one Keycloak realm.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenDecoder {
    /// `public_key` is either a PEM document or the bare base64 body Keycloak
    /// publishes in its realm metadata.
    pub fn new(public_key: &str, issuer: &str) -> Result<Self, String> {
        let pem = to_pem(public_key);
        let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| format!("invalid realm public key: {}", e))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.validate_aud = false;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify signature, `exp` and `iss`, then require a non-empty `sub`.
    pub fn decode(&self, token: &str) -> Result<AccessTokenClaims, DecodeError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.sub.trim().is_empty() {
            return Err(DecodeError::EmptyClaim("sub"));
        }

        Ok(data.claims)
    }
}

fn to_pem(key: &str) -> String {
    let key = key.trim();
    if key.starts_with("-----BEGIN") {
        return key.to_string();
    }

    // PEM bodies are wrapped at 64 columns
    let body = key
        .as_bytes()
        .chunks(64)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    format!("-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----\n", body)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;

    const PRIVATE_KEY: &str = include_str!("testdata/realm_key.pem");
    const PUBLIC_KEY: &str = include_str!("testdata/realm_public_key.txt");
    const ISSUER: &str = "https://sso.example.com/realms/acme";

    fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    fn sign(claims: serde_json::Value) -> String {
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap();
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap()
    }

    #[test]
    fn valid_token_yields_its_subject() {
        let decoder = TokenDecoder::new(PUBLIC_KEY, ISSUER).unwrap();
        let token = sign(json!({
            "iss": ISSUER,
            "sub": "kc-1",
            "exp": now() + 300,
            "aud": "account",
            "preferred_username": "ann"
        }));

        let claims = decoder.decode(&token).unwrap();
        assert_eq!(claims.sub, "kc-1");
        assert_eq!(claims.preferred_username.as_deref(), Some("ann"));
    }

    #[test]
    fn pem_form_of_the_key_is_accepted() {
        let pem = to_pem(PUBLIC_KEY);
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(pem.lines().all(|line| line.len() <= 64));
        assert!(TokenDecoder::new(&pem, ISSUER).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let decoder = TokenDecoder::new(PUBLIC_KEY, ISSUER).unwrap();
        let token = sign(json!({ "iss": ISSUER, "sub": "kc-1", "exp": now() - 3600 }));
        assert!(matches!(decoder.decode(&token), Err(DecodeError::Jwt(_))));
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let decoder = TokenDecoder::new(PUBLIC_KEY, ISSUER).unwrap();
        let token = sign(json!({
            "iss": "https://sso.example.com/realms/other",
            "sub": "kc-1",
            "exp": now() + 300
        }));
        assert!(decoder.decode(&token).is_err());
    }

    #[test]
    fn blank_subject_is_rejected() {
        let decoder = TokenDecoder::new(PUBLIC_KEY, ISSUER).unwrap();
        let token = sign(json!({ "iss": ISSUER, "sub": " ", "exp": now() + 300 }));
        assert!(matches!(
            decoder.decode(&token),
            Err(DecodeError::EmptyClaim("sub"))
        ));
    }

    #[test]
    fn opaque_token_is_rejected() {
        let decoder = TokenDecoder::new(PUBLIC_KEY, ISSUER).unwrap();
        assert!(decoder.decode("abc123").is_err());
    }

    #[test]
    fn garbage_key_is_a_startup_error() {
        assert!(TokenDecoder::new("not-a-key", ISSUER).is_err());
    }
}
