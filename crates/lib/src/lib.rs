//! vdeps-lib: dependency build orchestration
//!
//! Builds vendored CMake dependencies for the current platform in both
//! configurations and gathers their artifacts into a canonical layout:
//! - `config`: the TOML manifest, resolved for one platform
//! - `build`: configure/build state machine and cmake command lines
//! - `collect`: locating requested artifacts in build trees
//! - `layout`: the `lib/<platform>_<config>` and `tools/...` output trees
//! - `orchestrate`: running every selected dependency and reporting per unit

pub mod build;
pub mod collect;
pub mod config;
pub mod consts;
pub mod execute;
pub mod layout;
pub mod orchestrate;
pub mod placeholder;
pub mod platform;
pub mod util;
