//! Step definitions for task editing scenarios.

mod given;
mod then;
mod when;
pub mod world;
