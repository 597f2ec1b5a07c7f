//! Shared fixtures for issuer integration tests.

pub mod helpers;
