//! Full runs through the binary.

use predicates::prelude::*;

use vdeps_lib::build::BuildConfig;

use super::common::TestEnv;

const FOO: &str = r#"
[[dependency]]
name = "foo"
rel_path = "foo"
libs = ["foo"]
cmake_options = ["win:-DFOO_WIN=ON", "!win:-DFOO_UNIX=ON"]
"#;

#[test]
fn run_builds_and_copies_both_configs() {
  let env = TestEnv::new(FOO, &["foo"]);

  env
    .vdeps_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("foo [debug]"))
    .stdout(predicate::str::contains("foo [release]"))
    .stdout(predicate::str::contains("2 units, 0 failed"));

  assert!(env.lib_file(BuildConfig::Debug, "libfoo.a").is_file());
  assert!(env.lib_file(BuildConfig::Release, "libfoo.a").is_file());

  let calls = env.cmake_calls();
  let configures: Vec<_> = calls.iter().filter(|l| l.starts_with("-S ")).collect();
  assert_eq!(configures.len(), 2);
  for line in configures {
    assert!(line.contains("-DFOO_UNIX=ON"), "{line}");
    assert!(!line.contains("-DFOO_WIN=ON"), "{line}");
  }
}

#[test]
fn second_run_reuses_configuration() {
  let env = TestEnv::new(FOO, &["foo"]);

  env.vdeps_cmd().assert().success();
  env.vdeps_cmd().assert().success();

  assert_eq!(env.configure_count(), 2);
  assert_eq!(env.cmake_calls().len(), 6);
}

#[test]
fn build_flag_skips_configure_for_existing_dirs() {
  let env = TestEnv::new(FOO, &["foo"]);
  std::fs::create_dir_all(env.root().join("vdeps/foo/build_debug")).unwrap();
  std::fs::create_dir_all(env.root().join("vdeps/foo/build_release")).unwrap();

  env.vdeps_cmd().arg("--build").assert().success();

  assert_eq!(env.configure_count(), 0);
  assert!(env.lib_file(BuildConfig::Release, "libfoo.a").is_file());
}

#[test]
fn missing_artifact_sets_exit_code() {
  let config = r#"
[[dependency]]
name = "foo"
rel_path = "foo"
libs = ["bar"]

[[dependency]]
name = "baz"
rel_path = "baz"
libs = ["baz"]
"#;
  let env = TestEnv::new(config, &["foo", "baz"]);

  env
    .vdeps_cmd()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("missing library 'bar'"))
    .stdout(predicate::str::contains("4 units, 2 failed"));

  assert!(env.lib_file(BuildConfig::Debug, "libbaz.a").is_file());
}

#[test]
fn configure_failure_is_isolated() {
  let config = r#"
[[dependency]]
name = "broken"
rel_path = "broken"
libs = ["broken"]

[[dependency]]
name = "foo"
rel_path = "foo"
libs = ["foo"]
"#;
  let env = TestEnv::new(config, &["broken", "foo"]);

  env
    .vdeps_cmd()
    .env("FAKE_CMAKE_FAIL", "broken")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("broken [debug]: configure failed"));

  assert!(env.lib_file(BuildConfig::Release, "libfoo.a").is_file());
  assert!(!env.lib_file(BuildConfig::Debug, "libbroken.a").exists());
}

#[test]
fn named_dependency_overrides_build_by_default() {
  let config = r#"
[[dependency]]
name = "foo"
rel_path = "foo"
libs = ["foo"]

[[dependency]]
name = "optional"
rel_path = "optional"
libs = ["optional"]
build_by_default = false
"#;
  let env = TestEnv::new(config, &["foo", "optional"]);

  env.vdeps_cmd().assert().success();
  assert!(!env.lib_file(BuildConfig::Debug, "liboptional.a").exists());

  env.vdeps_cmd().arg("optional").assert().success();
  assert!(env.lib_file(BuildConfig::Debug, "liboptional.a").is_file());
}

#[test]
fn parallel_jobs_build_everything() {
  let config = r#"
[[dependency]]
name = "a"
rel_path = "a"
libs = ["a"]

[[dependency]]
name = "b"
rel_path = "b"
libs = ["b"]

[[dependency]]
name = "c"
rel_path = "c"
libs = ["c"]
"#;
  let env = TestEnv::new(config, &["a", "b", "c"]);

  env
    .vdeps_cmd()
    .args(["--jobs", "3"])
    .assert()
    .success()
    .stdout(predicate::str::contains("6 units, 0 failed"));

  for name in ["a", "b", "c"] {
    assert!(env.lib_file(BuildConfig::Release, &format!("lib{name}.a")).is_file());
  }
}

#[test]
fn temp_dir_moves_build_output() {
  let config = format!("temp_dir = \"out\"\n{FOO}");
  let env = TestEnv::new(&config, &["foo"]);

  env.vdeps_cmd().assert().success();

  assert!(env.root().join("out/foo_debug/CMakeCache.txt").is_file());
  assert!(!env.root().join("vdeps/foo/build_debug").exists());
}
