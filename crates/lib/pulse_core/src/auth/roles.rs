//! Role authorization gate.
//!
//! Maps a principal's role to an allowed-resource decision and a canonical
//! home destination. The fallback is uniform: unauthenticated goes to the
//! login page, an authenticated principal with no recognizable role lands
//! on the regular user home.

use serde::{Deserialize, Serialize};

/// Closed role enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Doctor,
    Admin,
}

impl Role {
    /// Canonical landing page for the role.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Doctor => "/doctor",
            Role::User => "/",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized role string.
#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Where an authenticated (or anonymous) principal should land by default.
pub fn home_path(role: Option<Role>) -> &'static str {
    match role {
        Some(role) => role.home_path(),
        None => "/login",
    }
}

/// Membership test against an explicit allow list.
///
/// An absent role is never allowed by any role list.
pub fn is_allowed(role: Option<Role>, allowed: &[Role]) -> bool {
    match role {
        Some(role) => allowed.contains(&role),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_paths() {
        assert_eq!(home_path(Some(Role::Admin)), "/admin/dashboard");
        assert_eq!(home_path(Some(Role::Doctor)), "/doctor");
        assert_eq!(home_path(Some(Role::User)), "/");
        assert_eq!(home_path(None), "/login");
    }

    #[test]
    fn allow_list_membership() {
        assert!(!is_allowed(Some(Role::User), &[Role::Admin]));
        assert!(is_allowed(Some(Role::Admin), &[Role::Admin, Role::Doctor]));
        assert!(!is_allowed(None, &[Role::User]));
        assert!(!is_allowed(Some(Role::Doctor), &[]));
    }

    #[test]
    fn parse_round_trip() {
        for role in [Role::User, Role::Doctor, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }
}
