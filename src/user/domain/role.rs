//! Account roles.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role governing what a user may see and change.
///
/// What each role is allowed to do is not hard-coded here; see
/// [`crate::access::CapabilityTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Sees and edits only their own tasks.
    #[default]
    Viewer,
    /// Intermediate role; its reach is decided by the capability table.
    Editor,
    /// Full access.
    Admin,
}

impl Role {
    /// All roles, lowest first.
    pub const ALL: [Self; 3] = [Self::Viewer, Self::Editor, Self::Admin];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Resolves a stored role column together with the legacy admin flag.
    ///
    /// A set flag always wins. A missing role column falls back to
    /// [`Role::Viewer`], matching the column default of older schemas.
    ///
    /// # Errors
    ///
    /// Returns [`ParseRoleError`] when the stored role is not recognised and
    /// the flag is not set.
    pub fn from_legacy(role: Option<&str>, is_admin: bool) -> Result<Self, ParseRoleError> {
        if is_admin {
            return Ok(Self::Admin);
        }
        role.map_or(Ok(Self::Viewer), Self::try_from)
    }

    /// Returns the value written to the legacy admin flag column.
    #[must_use]
    pub const fn legacy_admin_flag(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
