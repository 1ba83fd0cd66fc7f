//! Shared test helpers for `esignbridge-core` integration tests.
//!
//! In-memory implementations of every core port so lifecycle tests can run
//! without a cache process, a provider or a filesystem.

#![allow(dead_code)]

pub mod erp;
pub mod folders;
pub mod provider;
pub mod sink;
pub mod store;
