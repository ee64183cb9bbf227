//! Area gating
//!
//! The portal has one area per role. Each area is open only to users with
//! that role; there is no finer-grained permission model on the client.

use std::fmt;

use ayur_core::PortalError;
use ayur_models::Role;

use crate::session::{SessionContext, SessionUser};

/// Top-level section of the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalArea {
    /// `/admin/*` screens
    Admin,
    Practitioner,
    /// `/patient/*` screens
    Patient,
}

impl PortalArea {
    pub fn required_role(&self) -> Role {
        match self {
            PortalArea::Admin => Role::Admin,
            PortalArea::Practitioner => Role::Practitioner,
            PortalArea::Patient => Role::Patient,
        }
    }

    /// Area a user lands in after login
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => PortalArea::Admin,
            Role::Practitioner => PortalArea::Practitioner,
            Role::Patient => PortalArea::Patient,
        }
    }
}

impl fmt::Display for PortalArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PortalArea::Admin => "admin",
            PortalArea::Practitioner => "practitioner",
            PortalArea::Patient => "patient",
        })
    }
}

pub fn can_access(user: &SessionUser, area: PortalArea) -> bool {
    user.role == area.required_role()
}

/// The signed-in user, provided they may enter `area`
pub fn require_area(session: &SessionContext, area: PortalArea) -> Result<SessionUser, PortalError> {
    let user = session.require_user()?;
    if can_access(&user, area) {
        Ok(user)
    } else {
        tracing::warn!(user = %user.id, role = %user.role, %area, "area access denied");
        Err(PortalError::Forbidden {
            message: format!("the {area} area is not available to {} accounts", user.role),
        })
    }
}

pub fn require_admin(session: &SessionContext) -> Result<SessionUser, PortalError> {
    require_area(session, PortalArea::Admin)
}
