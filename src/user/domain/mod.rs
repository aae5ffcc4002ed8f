//! Domain model for user accounts.
//!
//! Users carry a single [`Role`]. The legacy boolean admin flag found in older
//! stored rows is folded into the role at the storage boundary and never
//! surfaces as a second axis of authority.

mod error;
mod ids;
mod role;
mod user;

pub use error::{ParseRoleError, UserDomainError};
pub use ids::UserId;
pub use role::Role;
pub use user::{EmailAddress, PasswordHash, PersistedUserData, User, Username};
