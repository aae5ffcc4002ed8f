//! Role-based access policy.
//!
//! Pure predicates deciding which tasks a user may see or change, and whether
//! they may manage other accounts. What each [`Role`](crate::user::domain::Role)
//! grants is data, held in a [`CapabilityTable`], so the reach of the editor
//! role is a configuration choice rather than something baked into code.

mod capability;
mod policy;

pub use capability::{Capabilities, CapabilityTable};
pub use policy::AccessPolicy;
