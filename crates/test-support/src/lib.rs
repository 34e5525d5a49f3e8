//! Shared helpers for the workspace's integration and end-to-end tests.

pub mod common;
pub mod support;
