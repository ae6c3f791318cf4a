use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;

use crate::auth::{Session, SessionClaims, SessionGate, SessionVerifier};
use crate::workflows::memory::InMemoryProfileRepository;
use crate::workflows::profiles::{Profile, ProfileId, ProfileRepository, Role};

pub(crate) const SECRET: &str = "workflow-secret";
pub(crate) const AUDIENCE: &str = "authenticated";

pub(crate) fn gate() -> SessionGate {
    SessionGate::new(SessionVerifier::new(SECRET, AUDIENCE))
}

pub(crate) fn session(id: &str) -> Session {
    Session {
        user_id: ProfileId(id.to_string()),
        email: None,
    }
}

pub(crate) fn bearer(user: &str) -> String {
    let claims = SessionClaims {
        sub: user.to_string(),
        email: None,
        aud: AUDIENCE.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as u64,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode token");
    format!("Bearer {token}")
}

pub(crate) fn json_request(method: &str, uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, bearer(user));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("build request")
}

pub(crate) fn get_request(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, bearer(user));
    }
    builder.body(Body::empty()).expect("build request")
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(crate) fn seed(
    repository: &InMemoryProfileRepository,
    id: &str,
    role: Role,
    email: Option<&str>,
) -> Profile {
    let mut profile = Profile::new(ProfileId(id.to_string()), Utc::now());
    profile.role = Some(role);
    profile.email = email.map(str::to_string);
    profile.is_driver = role == Role::Driver;
    repository.upsert(profile).expect("seed profile")
}
