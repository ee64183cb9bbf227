//! # ayur-auth
//!
//! Session handling for the AyurSutra portal.
//!
//! The portal never issues credentials itself. It holds a session obtained
//! at login (a bearer token plus the signed-in user) and gates each portal
//! area on the user's role.
//!
//! ## Features
//!
//! - Explicit `Session` with an `establish` / `clear` lifecycle
//! - In-memory and JSON-file session stores
//! - Token claim inspection (expiry, subject, role)
//! - Role-based area gating

pub mod jwt;
pub mod permissions;
pub mod session;

pub use jwt::{extract_bearer_token, inspect_live_token, inspect_token, Claims, TokenError};
pub use permissions::{can_access, require_admin, require_area, PortalArea};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionContext, SessionError, SessionStore,
    SessionUser,
};
