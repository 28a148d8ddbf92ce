mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmd::{RunArgs, cmd_run};
use output::print_error;
use vdeps_lib::consts::{CONFIG_FILE_NAME, DEPS_DIR_NAME};

/// vdeps - build vendored CMake dependencies into a canonical lib/tools layout
#[derive(Parser)]
#[command(name = "vdeps")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Dependencies to build (default: every dependency with build_by_default)
  names: Vec<String>,

  /// Skip configure for dependencies whose build directory already exists
  #[arg(long)]
  build: bool,

  /// Path to the configuration file
  #[arg(short, long, default_value = CONFIG_FILE_NAME)]
  config: PathBuf,

  /// Project root (default: the configuration file's directory)
  #[arg(long)]
  root: Option<PathBuf>,

  /// Dependencies directory, relative to the project root
  #[arg(long, default_value = DEPS_DIR_NAME)]
  deps_dir: PathBuf,

  /// Dependencies to process concurrently (0 = one per CPU)
  #[arg(short, long, default_value_t = 1)]
  jobs: usize,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("warn,vdeps={default_level},vdeps_lib={default_level}")));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let args = RunArgs {
    config: cli.config,
    root: cli.root,
    deps_dir: cli.deps_dir,
    names: cli.names,
    build_only: cli.build,
    jobs: cli.jobs,
  };

  match cmd_run(&args) {
    Ok(code) => code,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
