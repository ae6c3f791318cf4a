use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::AuthConfig;
use crate::workflows::profiles::ProfileId;

/// Authenticated caller resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: ProfileId,
    pub email: Option<String>,
}

/// Claims issued by the auth provider. `sub` is the profile id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub aud: String,
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid session token: {0}")]
    InvalidToken(String),
    #[error("session validation is not configured")]
    Unconfigured,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// HS256 verifier sharing the auth provider's signing secret.
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Option<Self> {
        config
            .jwt_secret
            .as_deref()
            .map(|secret| Self::new(secret, &config.audience))
    }

    pub fn verify(&self, token: &str) -> Result<Session, SessionError> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation)
            .map_err(|err| SessionError::InvalidToken(err.to_string()))?;
        let claims = data.claims;
        if claims.sub.trim().is_empty() {
            return Err(SessionError::InvalidToken("empty subject".to_string()));
        }
        Ok(Session {
            user_id: ProfileId(claims.sub),
            email: claims.email,
        })
    }
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVerifier").finish_non_exhaustive()
    }
}

/// Middleware state. A gate without a verifier rejects every protected request.
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    verifier: Option<Arc<SessionVerifier>>,
}

impl SessionGate {
    pub fn new(verifier: SessionVerifier) -> Self {
        Self {
            verifier: Some(Arc::new(verifier)),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        match SessionVerifier::from_config(config) {
            Some(verifier) => Self::new(verifier),
            None => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.verifier.is_some()
    }

    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Session, SessionError> {
        let verifier = self.verifier.as_ref().ok_or(SessionError::Unconfigured)?;
        let token = authorization
            .and_then(bearer_token)
            .ok_or(SessionError::MissingToken)?;
        verifier.verify(token)
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub async fn require_session(
    State(gate): State<SessionGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match gate.authenticate(authorization) {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(err) => {
            debug!(error = %err, "rejected unauthenticated request");
            err.into_response()
        }
    }
}

/// For public routes that act on behalf of a caller when one is signed in.
///
/// Requests without an `Authorization` header pass through anonymously; a presented
/// token must verify.
pub async fn attach_session(
    State(gate): State<SessionGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(authorization) = request.headers().get(header::AUTHORIZATION) else {
        return next.run(request).await;
    };

    match gate.authenticate(authorization.to_str().ok()) {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(err) => {
            debug!(error = %err, "rejected request with unusable session token");
            err.into_response()
        }
    }
}
