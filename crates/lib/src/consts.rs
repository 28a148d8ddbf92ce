/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "vdeps.toml";

/// Directory under the project root that holds dependency source trees.
pub const DEPS_DIR_NAME: &str = "vdeps";

pub const LIB_DIR_NAME: &str = "lib";
pub const TOOLS_DIR_NAME: &str = "tools";

/// File CMake writes once a build tree has been configured.
pub const CMAKE_CACHE_FILE: &str = "CMakeCache.txt";

pub const DEFAULT_CXX_STANDARD: u32 = 20;

/// Environment variable overriding the build tool binary.
pub const CMAKE_ENV: &str = "VDEPS_CMAKE";

/// Environment variable overriding the version control binary.
pub const GIT_ENV: &str = "VDEPS_GIT";
