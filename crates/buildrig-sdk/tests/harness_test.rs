//! End-to-end tests for the harness against stand-in tools.
//!
//! A fake build tool and a fake container runtime share a small image
//! table next to the scripts:
//! 1. `build` derives a 12-character id from the build file's checksum and
//!    records it under the file's `TAG` line
//! 2. `pull` records the pulled name under a fixed id
//! 3. `images -q` prints the recorded id (or nothing)
//! 4. `rmi` drops the entry, failing for unknown images

#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use buildrig_sdk::{
    BuildInvoker, BuildRunConfig, Console, Harness, HarnessConfig, HarnessError, ImageInspector,
    TempResourceKind, ToolLocation, VerbosityLevel,
};

const FAKE_ROCKER: &str = r#"#!/bin/sh
state="$(dirname "$0")/images.db"
cmd=
file=
last=
while [ $# -gt 0 ]; do
  case "$1" in
    -f) file="$2"; shift 2 ;;
    build|pull) cmd="$1"; shift ;;
    *) last="$1"; shift ;;
  esac
done
case "$cmd" in
  build)
    [ -n "$file" ] || file=Rockerfile
    [ -f "$file" ] || { echo "no build file: $file" >&2; exit 2; }
    tag=$(sed -n 's/^TAG //p' "$file" | tail -n 1)
    crc=$(cksum < "$file" | cut -d' ' -f1)
    id=$(printf 'b%011d' "$crc")
    echo "Successfully built $id"
    if [ -n "$tag" ]; then echo "$tag $id" >> "$state"; fi
    ;;
  pull)
    echo "Pulled $last"
    echo "$last p00000000000" >> "$state"
    ;;
  *) exit 64 ;;
esac
exit 0
"#;

const FAKE_DOCKER: &str = r#"#!/bin/sh
state="$(dirname "$0")/images.db"
case "$1" in
  images)
    if [ -f "$state" ]; then
      awk -v n="$3" '$1 == n { id = $2 } END { if (id) print id }' "$state"
    fi
    ;;
  rmi)
    if [ ! -f "$state" ] || ! grep -q "^$2 " "$state"; then
      echo "Error: No such image: $2" >&2
      exit 1
    fi
    grep -v "^$2 " "$state" > "$state.tmp"
    mv "$state.tmp" "$state"
    ;;
  *) exit 64 ;;
esac
exit 0
"#;

struct Env {
    root: tempfile::TempDir,
    console: Console,
    harness: Harness,
}

impl Env {
    fn rocker(&self) -> &BuildInvoker {
        self.harness.build_tool().expect("build tool")
    }

    fn docker(&self) -> &ImageInspector {
        self.harness.images().expect("runtime")
    }
}

fn install(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, script).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

fn setup(verbosity: VerbosityLevel) -> Env {
    let root = tempfile::tempdir().expect("tempdir");
    let bin = root.path().join("bin");
    std::fs::create_dir_all(&bin).expect("mkdir bin");
    let rocker = install(&bin, "rocker", FAKE_ROCKER);
    let docker = install(&bin, "docker", FAKE_DOCKER);

    let config = HarnessConfig {
        verbosity,
        build_tool: ToolLocation::Fixed(rocker),
        runtime: ToolLocation::Fixed(docker),
        fixture_base: Some(root.path().join("home/.buildrig-integ-tmp")),
        scratch_dir: Some(root.path().join("scratch")),
    };
    let console = Console::captured();
    let harness = Harness::with_console(&config, console.clone()).expect("harness");
    Env {
        root,
        console,
        harness,
    }
}

fn scratch_entries(env: &Env) -> usize {
    std::fs::read_dir(env.root.path().join("scratch")).map_or(0, Iterator::count)
}

#[test]
fn fixture_build_digest_and_remove() {
    let env = setup(VerbosityLevel::Quiet);
    let fixture = env
        .harness
        .workspace()
        .create_fixture(
            "rocker_build_",
            [
                ("Rockerfile", "FROM alpine:3.19\nCOPY app /app\nTAG buildrig/app:latest\n"),
                ("app/run.sh", "#!/bin/sh\necho hi\n"),
            ],
        )
        .expect("fixture");
    assert_eq!(fixture.kind(), TempResourceKind::Directory);
    assert!(fixture.path().starts_with(env.harness.workspace().base()));

    let _ = env
        .rocker()
        .build_file(&fixture.path().join("Rockerfile"), &[])
        .expect("build");

    let digest = env.docker().digest_of("buildrig/app:latest").expect("digest");
    assert_eq!(digest.as_str().len(), 12);
    assert!(digest.as_str().starts_with('b'));

    env.docker().remove("buildrig/app:latest").expect("rmi");
    let err = env.docker().digest_of("buildrig/app:latest").unwrap_err();
    assert!(matches!(err, HarnessError::OutputValidation { .. }));

    let path = fixture.path().to_path_buf();
    fixture.close().expect("close fixture");
    assert!(!path.exists());
}

#[test]
fn identical_content_yields_identical_digest() {
    let env = setup(VerbosityLevel::Quiet);
    let content = "FROM alpine:3.19\nRUN echo same\nTAG buildrig/same:latest\n";

    let _ = env.rocker().build(content).expect("first build");
    let first = env.docker().digest_of("buildrig/same:latest").expect("first");
    let _ = env.rocker().build(content).expect("second build");
    let second = env.docker().digest_of("buildrig/same:latest").expect("second");

    assert_eq!(first, second);
    assert_eq!(scratch_entries(&env), 0);
}

#[test]
fn no_cache_global_option_produces_exact_argument_vector() {
    let env = setup(VerbosityLevel::Quiet);
    let outcome = env
        .rocker()
        .run(BuildRunConfig::from_content("FROM scratch\n").global_options(["--no-cache"]))
        .expect("build");

    let args = outcome.args_lossy();
    let generated = Path::new(&args[3]);
    assert_eq!(args, ["--no-cache", "build", "-f", args[3].as_str()]);
    assert!(generated.starts_with(env.root.path().join("scratch")));
    assert!(!generated.exists());
}

#[test]
fn failing_build_reports_command_and_cleans_up() {
    let env = setup(VerbosityLevel::Quiet);
    let err = env
        .rocker()
        .build_in_dir(&env.root.path().join("scratch-missing-ctx"), &[])
        .unwrap_err();
    // The working directory does not exist, so the tool cannot even start.
    assert!(matches!(err, HarnessError::Launch { .. }));

    let ctx = env
        .harness
        .workspace()
        .create_fixture("empty_ctx_", Vec::<(&str, &str)>::new())
        .expect("fixture");
    let err = env.rocker().build_in_dir(ctx.path(), &[]).unwrap_err();
    let HarnessError::Execution { command, status } = err else {
        panic!("expected execution error");
    };
    assert_eq!(status.code(), Some(2));
    assert!(command.ends_with("rocker build"));
    assert_eq!(scratch_entries(&env), 0);
}

#[test]
fn build_in_dir_uses_context_rockerfile() {
    let env = setup(VerbosityLevel::Trace);
    let ctx = env
        .harness
        .workspace()
        .create_fixture("ctx_", [("Rockerfile", "FROM alpine\nTAG buildrig/ctx:1\n")])
        .expect("fixture");

    let outcome = env.rocker().build_in_dir(ctx.path(), &["--no-cache"]).expect("build");
    assert_eq!(outcome.args_lossy(), ["build", "--no-cache"]);
    assert!(env.docker().digest_of("buildrig/ctx:1").is_ok());

    let printed = env.console.stdout_text();
    assert!(printed.contains(&format!("temp directory: {}", ctx.path().display())));
    assert!(printed.contains(&format!("CWD: {}", ctx.path().display())));
    assert!(printed.contains("Successfully built"));
}

#[test]
fn pull_then_inspect() {
    let env = setup(VerbosityLevel::Quiet);
    let outcome = env.rocker().pull("alpine:3.19").expect("pull");
    assert_eq!(outcome.args_lossy(), ["pull", "alpine:3.19"]);
    let digest = env.docker().digest_of("alpine:3.19").expect("digest");
    assert_eq!(digest.as_str(), "p00000000000");
}

#[test]
fn trace_level_sink_matches_console() {
    let env = setup(VerbosityLevel::Trace);
    let mut sink = Vec::new();
    let outcome = env
        .rocker()
        .run(
            BuildRunConfig::from_content("FROM alpine\nTAG buildrig/tee:latest\n")
                .build_options(["--var", "X=1"])
                .output(&mut sink),
        )
        .expect("build");

    let echoed = format!("Running: {}\n", outcome.command_line);
    let console = env.console.stdout_bytes();
    assert!(console.starts_with(echoed.as_bytes()));
    assert_eq!(&console[echoed.len()..], sink.as_slice());
    assert!(String::from_utf8_lossy(&sink).starts_with("Successfully built b"));
}

#[test]
fn commands_level_echoes_without_mirroring() {
    let env = setup(VerbosityLevel::Commands);
    let mut sink = Vec::new();
    let outcome = env
        .rocker()
        .run(BuildRunConfig::from_content("FROM alpine\n").output(&mut sink))
        .expect("build");

    assert_eq!(env.console.stdout_text(), format!("Running: {}\n", outcome.command_line));
    assert!(!sink.is_empty());
    assert!(env.console.stderr_bytes().is_empty());
}

#[test]
fn concurrent_scenarios_never_share_paths() {
    let env = setup(VerbosityLevel::Quiet);
    let paths: Vec<PathBuf> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let harness = &env.harness;
                scope.spawn(move || {
                    let fixture = harness
                        .workspace()
                        .create_fixture(
                            "parallel_",
                            [("Rockerfile", format!("FROM alpine\nTAG buildrig/par:{i}\n"))],
                        )
                        .expect("fixture");
                    let _ = harness
                        .build_tool()
                        .expect("build tool")
                        .build_file(&fixture.path().join("Rockerfile"), &[])
                        .expect("build");
                    fixture.keep().expect("keep")
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("join")).collect()
    });

    let mut unique = paths.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), paths.len());

    for i in 0..8 {
        assert!(env.docker().digest_of(&format!("buildrig/par:{i}")).is_ok());
    }
    for path in paths {
        std::fs::remove_dir_all(path).expect("cleanup");
    }
}

#[test]
fn missing_build_tool_is_launch_error() {
    let root = tempfile::tempdir().expect("tempdir");
    let config = HarnessConfig {
        build_tool: ToolLocation::Fixed(root.path().join("bin/rocker")),
        runtime: ToolLocation::Fixed(root.path().join("bin/docker")),
        fixture_base: Some(root.path().join("fixtures")),
        scratch_dir: Some(root.path().join("scratch")),
        ..HarnessConfig::default()
    };
    let harness = Harness::with_console(&config, Console::captured()).expect("harness");
    let err = harness
        .build_tool()
        .expect("build tool")
        .build("FROM scratch\n")
        .unwrap_err();
    assert!(matches!(err, HarnessError::Launch { .. }));
    assert!(err.command().is_some_and(|c| c.contains("bin/rocker build -f")));
}
