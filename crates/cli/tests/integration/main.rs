//! End-to-end runs of the vdeps binary against a fake cmake.

#![cfg(unix)]

mod build_tests;
mod common;
