//! Application services for user accounts.

mod accounts;

pub use accounts::{
    AccountRequest, AccountService, AccountServiceError, AccountServiceResult,
};
