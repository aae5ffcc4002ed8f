//! Role to capability mapping.

use crate::user::domain::Role;
use serde::{Deserialize, Serialize};

/// What a role is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// May list and open every task, not just owned ones.
    pub view_all: bool,
    /// May edit every task and reassign task ownership.
    pub edit_all: bool,
    /// May create, edit and delete user accounts.
    pub manage_users: bool,
}

impl Capabilities {
    /// No capabilities beyond the user's own tasks.
    pub const OWN_TASKS_ONLY: Self = Self {
        view_all: false,
        edit_all: false,
        manage_users: false,
    };

    /// Every capability.
    pub const FULL: Self = Self {
        view_all: true,
        edit_all: true,
        manage_users: true,
    };
}

/// Capabilities for each role.
///
/// Serialises as an object keyed by role name, for example
/// `{"viewer": {}, "editor": {"view_all": true}, "admin": {"view_all": true,
/// "edit_all": true, "manage_users": true}}`. Omitted roles keep their
/// [`CapabilityTable::legacy`] entry; omitted flags are off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityTable {
    viewer: Capabilities,
    editor: Capabilities,
    admin: Capabilities,
}

impl CapabilityTable {
    /// Only administrators see or edit other users' tasks. Editors have the
    /// same reach as viewers.
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            viewer: Capabilities::OWN_TASKS_ONLY,
            editor: Capabilities::OWN_TASKS_ONLY,
            admin: Capabilities::FULL,
        }
    }

    /// Like [`Self::legacy`], but editors may view every task.
    #[must_use]
    pub const fn editor_views_all() -> Self {
        Self {
            viewer: Capabilities::OWN_TASKS_ONLY,
            editor: Capabilities {
                view_all: true,
                edit_all: false,
                manage_users: false,
            },
            admin: Capabilities::FULL,
        }
    }

    /// Returns a copy of the table with `role` mapped to `capabilities`.
    #[must_use]
    pub const fn with(mut self, role: Role, capabilities: Capabilities) -> Self {
        match role {
            Role::Viewer => self.viewer = capabilities,
            Role::Editor => self.editor = capabilities,
            Role::Admin => self.admin = capabilities,
        }
        self
    }

    /// Returns the capabilities granted to `role`.
    #[must_use]
    pub const fn for_role(&self, role: Role) -> Capabilities {
        match role {
            Role::Viewer => self.viewer,
            Role::Editor => self.editor,
            Role::Admin => self.admin,
        }
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::legacy()
    }
}
