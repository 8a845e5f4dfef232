use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};

use crate::services::auth::credential::Credential;
use crate::services::auth::decode::TokenDecoder;
use crate::services::auth::error::AuthError;
use crate::services::provider::IdentityProvider;

/// A bearer token the provider confirmed as active in this request.
///
/// Only `TokenValidator` creates these; the fields cannot be changed afterwards.
#[derive(Clone)]
pub struct ValidatedToken {
    access_token: String,
    subject: String,
    expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for ValidatedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the bearer token
        f.debug_struct("ValidatedToken")
            .field("subject", &self.subject)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl ValidatedToken {
    fn new(access_token: &str, subject: String, exp: Option<i64>) -> Self {
        Self {
            access_token: access_token.to_string(),
            subject,
            expires_at: exp.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    // Provider-issued user id (`sub`)
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

/// Where the subject of an active token comes from.
#[derive(Debug, Clone)]
pub enum SubjectSource {
    /// Read `sub` from the same introspection call that checks activity.
    Introspection,
    /// Verify and decode the JWT locally after the activity check.
    Decode(TokenDecoder),
}

/// Outcome of a successful authentication attempt.
#[derive(Debug, Clone)]
pub enum Authentication {
    /// No `Authorization` header; the provider was not contacted.
    Anonymous,
    Token(ValidatedToken),
}

#[derive(Clone)]
pub struct TokenValidator {
    provider: Arc<dyn IdentityProvider>,
    subject_source: SubjectSource,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("provider", &self.provider.provider_name())
            .field("subject_source", &self.subject_source)
            .finish()
    }
}

impl TokenValidator {
    pub fn new(provider: Arc<dyn IdentityProvider>, subject_source: SubjectSource) -> Self {
        Self {
            provider,
            subject_source,
        }
    }

    /// Header → credential → provider check.
    ///
    /// - no header: `Anonymous`, no network call
    /// - malformed header: `MalformedCredential`, no network call
    /// - anything the provider does not positively confirm: `InactiveOrExpired`
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Authentication, AuthError> {
        match Credential::from_headers(headers) {
            Credential::Absent => Ok(Authentication::Anonymous),
            Credential::Malformed => Err(AuthError::MalformedCredential),
            Credential::Bearer(token) => self.validate(token).await.map(Authentication::Token),
        }
    }

    pub async fn validate(&self, token: &str) -> Result<ValidatedToken, AuthError> {
        match &self.subject_source {
            SubjectSource::Introspection => {
                let info = match self.provider.introspect(token).await {
                    Ok(info) => info,
                    Err(err) => {
                        tracing::warn!(error = %err, "token introspection failed");
                        return Err(AuthError::InactiveOrExpired);
                    }
                };

                if !info.active {
                    return Err(AuthError::InactiveOrExpired);
                }

                let subject = info
                    .sub
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        tracing::warn!("active token introspected without a subject");
                        AuthError::InactiveOrExpired
                    })?;

                Ok(ValidatedToken::new(token, subject, info.exp))
            }
            SubjectSource::Decode(decoder) => {
                if !self.provider.is_active(token).await {
                    return Err(AuthError::InactiveOrExpired);
                }

                let claims = decoder.decode(token).map_err(|err| {
                    tracing::warn!(error = %err, "access token decoding failed");
                    AuthError::InactiveOrExpired
                })?;

                let exp = i64::try_from(claims.exp).ok();
                Ok(ValidatedToken::new(token, claims.sub, exp))
            }
        }
    }
}
