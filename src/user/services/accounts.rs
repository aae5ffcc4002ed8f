//! Registration, authentication, and administrator account management.

use crate::access::AccessPolicy;
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::user::{
    domain::{EmailAddress, PasswordHash, Role, User, UserDomainError, UserId, Username},
    ports::{PasswordHashError, PasswordHasher, UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Account details as submitted on a registration or administration form.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountRequest {
    username: String,
    email: String,
    password: String,
    role: Role,
}

impl AccountRequest {
    /// Creates a request for a viewer account.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role: Role::Viewer,
        }
    }

    /// Sets the role. Ignored by self-registration.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

impl std::fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountServiceError {
    /// Submitted account details were invalid.
    #[error(transparent)]
    Domain(#[from] UserDomainError),

    /// Email and password did not identify an account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The acting user may not manage accounts.
    #[error("user {0} may not manage accounts")]
    Forbidden(UserId),

    /// The user does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Password hashing failed.
    #[error(transparent)]
    Hashing(#[from] PasswordHashError),

    /// User repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),

    /// Task repository operation failed while removing a user's tasks.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for account service operations.
pub type AccountServiceResult<T> = Result<T, AccountServiceError>;

/// Account orchestration service.
#[derive(Clone)]
pub struct AccountService<U, T, H, C>
where
    U: UserRepository,
    T: TaskRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    tasks: Arc<T>,
    hasher: Arc<H>,
    clock: Arc<C>,
    policy: AccessPolicy,
}

impl<U, T, H, C> AccountService<U, T, H, C>
where
    U: UserRepository,
    T: TaskRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(
        users: Arc<U>,
        tasks: Arc<T>,
        hasher: Arc<H>,
        clock: Arc<C>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            users,
            tasks,
            hasher,
            clock,
            policy,
        }
    }

    /// Registers a new viewer account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Domain`] for invalid details and
    /// [`AccountServiceError::Repository`] when the email or username is taken.
    pub async fn register(&self, request: AccountRequest) -> AccountServiceResult<User> {
        let user = self.build_user(request.with_role(Role::Viewer))?;
        self.users.store(&user).await?;
        info!(user = %user.id(), username = %user.username(), "user registered");
        Ok(user)
    }

    /// Checks credentials and returns the matching account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::InvalidCredentials`] for an unknown
    /// email or a wrong password alike.
    pub async fn authenticate(&self, email: &str, password: &str) -> AccountServiceResult<User> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(AccountServiceError::InvalidCredentials);
        };
        let Some(user) = self.users.find_by_email(&address).await? else {
            warn!(email = %address, "login with unknown email");
            return Err(AccountServiceError::InvalidCredentials);
        };
        if !self.hasher.verify(password, user.password_hash())? {
            warn!(user = %user.id(), "login with wrong password");
            return Err(AccountServiceError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Lists every account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Forbidden`] unless the actor may manage
    /// accounts.
    pub async fn list_users(&self, actor_id: UserId) -> AccountServiceResult<Vec<User>> {
        self.require_manager(actor_id).await?;
        Ok(self.users.list().await?)
    }

    /// Creates an account with an explicit role.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Forbidden`] unless the actor may manage
    /// accounts, plus the errors of [`Self::register`].
    pub async fn add_user(
        &self,
        actor_id: UserId,
        request: AccountRequest,
    ) -> AccountServiceResult<User> {
        let actor = self.require_manager(actor_id).await?;
        let user = self.build_user(request)?;
        self.users.store(&user).await?;
        info!(actor = %actor.id(), user = %user.id(), role = %user.role(), "user added");
        Ok(user)
    }

    /// Replaces an account's username, email and role. A blank password
    /// keeps the stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Forbidden`] unless the actor may manage
    /// accounts, [`AccountServiceError::NotFound`] for an unknown user,
    /// [`AccountServiceError::Domain`] for invalid details, and repository
    /// errors for taken keys.
    pub async fn edit_user(
        &self,
        actor_id: UserId,
        user_id: UserId,
        request: AccountRequest,
    ) -> AccountServiceResult<User> {
        let actor = self.require_manager(actor_id).await?;
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountServiceError::NotFound(user_id))?;

        user.rename(Username::new(request.username)?);
        user.change_email(EmailAddress::new(request.email)?);
        user.assign_role(request.role);
        if !request.password.trim().is_empty() {
            user.replace_password_hash(self.hasher.hash(&request.password)?);
        }
        self.users.update(&user).await?;
        info!(actor = %actor.id(), user = %user.id(), role = %user.role(), "user edited");
        Ok(user)
    }

    /// Deletes an account together with every task it owns.
    ///
    /// Tasks go first, then the account. The two steps are separate repository
    /// calls and are not atomic: if the account delete fails, the owned tasks
    /// stay deleted and the account remains. Calling again finishes the job.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Forbidden`] unless the actor may manage
    /// accounts, [`AccountServiceError::NotFound`] for an unknown user, and
    /// repository errors from either step.
    pub async fn delete_user(
        &self,
        actor_id: UserId,
        user_id: UserId,
    ) -> AccountServiceResult<()> {
        let actor = self.require_manager(actor_id).await?;
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AccountServiceError::NotFound(user_id));
        }
        let removed = self.tasks.delete_owned_by(user_id).await?;
        if let Err(err) = self.users.delete(user_id).await {
            warn!(
                user = %user_id,
                tasks = removed,
                error = %err,
                "owned tasks deleted but account deletion failed"
            );
            return Err(err.into());
        }
        info!(actor = %actor.id(), user = %user_id, tasks = removed, "user deleted");
        Ok(())
    }

    async fn require_manager(&self, actor_id: UserId) -> AccountServiceResult<User> {
        let actor = self
            .users
            .find_by_id(actor_id)
            .await?
            .ok_or(AccountServiceError::NotFound(actor_id))?;
        if !self.policy.can_manage_users(&actor) {
            warn!(actor = %actor_id, "account management refused");
            return Err(AccountServiceError::Forbidden(actor_id));
        }
        Ok(actor)
    }

    fn build_user(&self, request: AccountRequest) -> AccountServiceResult<User> {
        let username = Username::new(request.username)?;
        let email = EmailAddress::new(request.email)?;
        if request.password.is_empty() {
            return Err(UserDomainError::EmptyPassword.into());
        }
        let hash: PasswordHash = self.hasher.hash(&request.password)?;
        Ok(User::new(username, email, hash, request.role, &*self.clock))
    }
}
