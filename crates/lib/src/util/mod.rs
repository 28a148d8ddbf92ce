//! Shared utilities.
//!
//! Test helpers only: the recording tool runner and filesystem fixtures.

#[cfg(test)]
pub mod testutil;
