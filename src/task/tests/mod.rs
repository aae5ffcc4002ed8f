//! Unit tests for the task module.
//!
//! Tests are organised by layer: domain parsing, the edit engine, and the
//! service orchestration over in-memory and mocked repositories.

mod edit_tests;
mod support;
