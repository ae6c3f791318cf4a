//! Per-request session validation.
//!
//! Clients send the auth provider's access token as `Authorization: Bearer <jwt>`.
//! [`require_session`] verifies it and inserts a [`Session`] extension that
//! protected handlers extract.

mod access;
mod session;

pub use access::{ensure_admin, ensure_same_user, AccessError};
pub use session::{
    attach_session, require_session, Session, SessionClaims, SessionError, SessionGate,
    SessionVerifier,
};
