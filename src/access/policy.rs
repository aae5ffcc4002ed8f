//! Access predicates over already-loaded users and tasks.

use super::{Capabilities, CapabilityTable};
use crate::task::domain::Task;
use crate::user::domain::User;

/// Decides what a user may see and change.
///
/// Every method is a pure function of its arguments and the capability
/// table; nothing is loaded or cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessPolicy {
    table: CapabilityTable,
}

impl AccessPolicy {
    /// Creates a policy backed by `table`.
    #[must_use]
    pub const fn new(table: CapabilityTable) -> Self {
        Self { table }
    }

    /// Returns the backing capability table.
    #[must_use]
    pub const fn table(&self) -> &CapabilityTable {
        &self.table
    }

    /// Returns the capabilities of `user`.
    #[must_use]
    pub const fn capabilities(&self, user: &User) -> Capabilities {
        self.table.for_role(user.role())
    }

    /// Whether `user` may see tasks owned by others.
    #[must_use]
    pub const fn can_view_all(&self, user: &User) -> bool {
        self.capabilities(user).view_all
    }

    /// Whether `user` may edit and reassign tasks owned by others.
    #[must_use]
    pub const fn can_edit_all(&self, user: &User) -> bool {
        self.capabilities(user).edit_all
    }

    /// Whether `user` may administer accounts.
    #[must_use]
    pub const fn can_manage_users(&self, user: &User) -> bool {
        self.capabilities(user).manage_users
    }

    /// Whether `user` may open `task`.
    #[must_use]
    pub fn may_view(&self, user: &User, task: &Task) -> bool {
        task.user_id() == user.id() || self.can_view_all(user)
    }

    /// Whether `user` may edit or delete `task`.
    #[must_use]
    pub fn may_edit(&self, user: &User, task: &Task) -> bool {
        task.user_id() == user.id() || self.can_edit_all(user)
    }

    /// Narrows `tasks` to the visibility scope of `user`.
    #[must_use]
    pub fn visible_tasks(&self, user: &User, tasks: Vec<Task>) -> Vec<Task> {
        if self.can_view_all(user) {
            return tasks;
        }
        tasks
            .into_iter()
            .filter(|task| task.user_id() == user.id())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::AccessPolicy;
    use crate::access::CapabilityTable;
    use crate::task::domain::{NewTask, Task};
    use crate::user::domain::{EmailAddress, PasswordHash, Role, User, Username};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn user(name: &str, role: Role) -> User {
        User::new(
            Username::new(name).expect("valid username"),
            EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
            PasswordHash::from_encoded("hash"),
            role,
            &DefaultClock,
        )
    }

    fn task_for(owner: &User, name: &str) -> Task {
        Task::new(NewTask::new(name, owner.id()), &DefaultClock)
    }

    #[rstest]
    #[case(CapabilityTable::legacy(), Role::Viewer, 1)]
    #[case(CapabilityTable::legacy(), Role::Editor, 1)]
    #[case(CapabilityTable::legacy(), Role::Admin, 3)]
    #[case(CapabilityTable::editor_views_all(), Role::Viewer, 1)]
    #[case(CapabilityTable::editor_views_all(), Role::Editor, 3)]
    #[case(CapabilityTable::editor_views_all(), Role::Admin, 3)]
    fn visible_tasks_follows_the_capability_table(
        #[case] table: CapabilityTable,
        #[case] role: Role,
        #[case] expected: usize,
    ) {
        let actor = user("actor", role);
        let other = user("other", Role::Viewer);
        let tasks = vec![
            task_for(&actor, "mine"),
            task_for(&other, "theirs"),
            task_for(&other, "theirs too"),
        ];

        let visible = AccessPolicy::new(table).visible_tasks(&actor, tasks);

        assert_eq!(visible.len(), expected);
        if expected == 1 {
            assert!(visible.iter().all(|task| task.user_id() == actor.id()));
        }
    }

    #[rstest]
    #[case(Role::Viewer, true, true)]
    #[case(Role::Viewer, false, false)]
    #[case(Role::Editor, false, false)]
    #[case(Role::Admin, false, true)]
    fn may_edit_requires_ownership_or_edit_all(
        #[case] role: Role,
        #[case] owns_task: bool,
        #[case] expected: bool,
    ) {
        let actor = user("actor", role);
        let other = user("other", Role::Viewer);
        let task = if owns_task {
            task_for(&actor, "mine")
        } else {
            task_for(&other, "theirs")
        };

        assert_eq!(AccessPolicy::default().may_edit(&actor, &task), expected);
    }

    #[test]
    fn editor_views_all_does_not_grant_editing() {
        let policy = AccessPolicy::new(CapabilityTable::editor_views_all());
        let editor = user("editor", Role::Editor);
        let task = task_for(&user("other", Role::Viewer), "theirs");

        assert!(policy.may_view(&editor, &task));
        assert!(!policy.may_edit(&editor, &task));
    }

    #[test]
    fn legacy_policy_keeps_view_and_edit_identical() {
        let policy = AccessPolicy::default();
        for role in Role::ALL {
            let actor = user("actor", role);
            assert_eq!(policy.can_view_all(&actor), policy.can_edit_all(&actor));
        }
    }
}
