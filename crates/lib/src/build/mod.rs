//! Build driver: configure and build one dependency per configuration.
//!
//! Each (dependency, configuration) pair is a unit moving through
//! [`UnitState`]. Configure runs only when the build-output directory has no
//! completed CMake configuration ([`BuildState`]); with [`BuildMode::BuildOnly`]
//! any existing directory is trusted. The build step runs every time.
//!
//! # Submodules
//!
//! - [`driver`] - the state machine and tool invocations
//! - [`toolchain`] - cmake command lines and per-platform defaults
//! - [`paths`] - build-output directory placement
//! - [`env`] - library search environment

pub mod driver;
pub mod env;
pub mod paths;
pub mod toolchain;
mod types;

pub use driver::{BuildDriver, BuildError, BuildJob, ConfigureAction, SubmoduleOutcome};
pub use paths::{build_dir, collection_root};
pub use toolchain::Toolchain;
pub use types::*;
