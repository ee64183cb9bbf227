//! Session lifecycle
//!
//! A session is the bearer token and signed-in user captured at login. It is
//! persisted through a [`SessionStore`] (a JSON file for the CLI) and shared
//! with the HTTP transport through a [`SessionContext`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ayur_core::traits::Id;
use ayur_core::PortalError;
use ayur_models::{Role, User};

use crate::jwt::{inspect_token, Claims, TokenError};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session expired")]
    Expired,
    #[error("Session invalid: {0}")]
    Invalid(String),
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error("Session storage failed: {0}")]
    Storage(String),
}

impl From<TokenError> for SessionError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => SessionError::Expired,
            TokenError::Missing => SessionError::NotAuthenticated,
            TokenError::Invalid(msg) => SessionError::Invalid(msg),
        }
    }
}

impl From<SessionError> for PortalError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotAuthenticated | SessionError::Expired => PortalError::Unauthorized {
                message: err.to_string(),
            },
            other => PortalError::Session(other.to_string()),
        }
    }
}

/// The signed-in user as remembered by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(alias = "_id")]
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    /// Build the user from token claims; `sub` and `role` are required
    pub fn from_claims(claims: &Claims) -> Result<Self, SessionError> {
        let id = claims
            .sub
            .clone()
            .ok_or_else(|| SessionError::Invalid("token has no subject".into()))?;
        let role = claims
            .role
            .as_deref()
            .ok_or_else(|| SessionError::Invalid("token has no role".into()))?
            .parse::<Role>()
            .map_err(SessionError::Invalid)?;
        Ok(Self {
            id,
            name: claims.name.clone().unwrap_or_default(),
            email: claims.email.clone().unwrap_or_default(),
            role,
        })
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Session data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    /// Taken from the token's `exp` claim when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        let token = token.into();
        let expires_at = inspect_token(&token).ok().and_then(|c| c.expires_at());
        Self {
            token,
            user,
            expires_at,
        }
    }

    /// Session whose user is read from the token itself
    pub fn from_token(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();
        let claims = inspect_token(&token)?;
        let user = SessionUser::from_claims(&claims)?;
        Ok(Self {
            expires_at: claims.expires_at(),
            token,
            user,
        })
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && self.expires_at.map_or(true, |at| now < at)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Where a session survives between runs
pub trait SessionStore: Send + Sync {
    /// `Ok(None)` when nobody is signed in
    fn load(&self) -> Result<Option<Session>, SessionError>;

    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Forget the stored session; clearing an empty store succeeds
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-memory session store (for tests and embedding)
#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.read().clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.session.write() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.session.write().take();
        Ok(())
    }
}

/// Session persisted as `{ "token": ..., "user": {...} }` in a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Storage(e.to_string())),
        };
        let session: Session =
            serde_json::from_str(&raw).map_err(|e| SessionError::Invalid(e.to_string()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| SessionError::Storage(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }
}

/// Shared handle to the current session
///
/// Cheap to clone; every clone sees the same session. The transport reads the
/// bearer token from here on each request.
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Context backed by a throwaway in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Pick up a previously stored session; expired ones are discarded
    pub fn restore(&self) -> Result<Option<Session>, SessionError> {
        let session = self.store.load()?.filter(|s| {
            let valid = s.is_valid();
            if !valid {
                tracing::info!(user = %s.user.id, "stored session expired");
            }
            valid
        });
        *self.current.write() = session.clone();
        Ok(session)
    }

    /// Sign in: remember `session` here and in the store
    pub fn establish(&self, session: Session) -> Result<(), SessionError> {
        if !session.is_valid() {
            return Err(SessionError::Expired);
        }
        self.store.save(&session)?;
        tracing::info!(user = %session.user.id, role = %session.user.role, "session established");
        *self.current.write() = Some(session);
        Ok(())
    }

    /// Sign out
    pub fn clear(&self) -> Result<(), SessionError> {
        let previous = self.current.write().take();
        self.store.clear()?;
        if let Some(session) = previous {
            tracing::info!(user = %session.user.id, "session cleared");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.current.read().as_ref().map(|s| s.user.clone())
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .filter(|s| s.is_valid())
            .map(|s| s.token.clone())
    }

    /// The signed-in user, or `NotAuthenticated`
    pub fn require_user(&self) -> Result<SessionUser, SessionError> {
        match self.current.read().as_ref() {
            Some(s) if s.is_valid() => Ok(s.user.clone()),
            Some(_) => Err(SessionError::Expired),
            None => Err(SessionError::NotAuthenticated),
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user", &self.user().map(|u| u.id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::tests::token_for;

    fn admin() -> SessionUser {
        SessionUser {
            id: "u1".into(),
            name: "Asha Menon".into(),
            email: "asha@ayursutra.in".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_session_from_token() {
        let token = token_for(&Claims {
            sub: Some("pt1".into()),
            exp: Some(4_102_444_800),
            name: Some("Kiran Rao".into()),
            role: Some("patient".into()),
            ..Default::default()
        });
        let session = Session::from_token(token).unwrap();
        assert_eq!(session.user.id, "pt1");
        assert_eq!(session.user.role, Role::Patient);
        assert!(session.expires_at.is_some());
        assert!(session.is_valid());
    }

    #[test]
    fn test_token_without_role_is_rejected() {
        let token = token_for(&Claims {
            sub: Some("pt1".into()),
            ..Default::default()
        });
        assert!(matches!(
            Session::from_token(token),
            Err(SessionError::Invalid(_))
        ));
    }

    #[test]
    fn test_opaque_token_session_never_expires() {
        let session = Session::new("opaque-token", admin());
        assert_eq!(session.expires_at, None);
        assert!(session.is_valid());
    }

    #[test]
    fn test_file_store_round_trip_and_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));
        assert!(store.load().unwrap().is_none());

        let session = Session::new("opaque-token", admin());
        store.save(&session).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["token"], "opaque-token");
        assert_eq!(raw["user"]["role"], "admin");

        assert_eq!(store.load().unwrap(), Some(session));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_accepts_underscore_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"token":"t","user":{"_id":"65f0","name":"Asha","email":"a@x.in","role":"admin"}}"#,
        )
        .unwrap();
        let session = FileSessionStore::new(path).load().unwrap().unwrap();
        assert_eq!(session.user.id, "65f0");
    }

    #[test]
    fn test_context_lifecycle() {
        let store = Arc::new(MemorySessionStore::new());
        let context = SessionContext::new(store.clone());
        assert!(context.bearer_token().is_none());
        assert!(matches!(
            context.require_user(),
            Err(SessionError::NotAuthenticated)
        ));

        context
            .establish(Session::new("opaque-token", admin()))
            .unwrap();
        assert_eq!(context.bearer_token().as_deref(), Some("opaque-token"));
        assert!(store.load().unwrap().is_some());

        let other = context.clone();
        other.clear().unwrap();
        assert!(context.current().is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_restore_drops_expired_session() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = Session::new("opaque-token", admin());
        session.expires_at = Some(Utc::now() - chrono::Duration::hours(1));
        store.save(&session).unwrap();

        let context = SessionContext::new(store);
        assert!(context.restore().unwrap().is_none());
        assert!(context.current().is_none());
    }

    #[test]
    fn test_establish_rejects_expired_session() {
        let context = SessionContext::in_memory();
        let mut session = Session::new("opaque-token", admin());
        session.expires_at = Some(Utc::now() - chrono::Duration::minutes(1));
        assert!(matches!(
            context.establish(session),
            Err(SessionError::Expired)
        ));
    }

    #[test]
    fn test_session_error_maps_to_portal_error() {
        let err: PortalError = SessionError::NotAuthenticated.into();
        assert_eq!(err.status_code(), Some(401));
    }
}
