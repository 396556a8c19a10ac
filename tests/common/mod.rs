//! Shared test infrastructure for integration tests.
//!
//! Each fixture is an isolated temp directory holding a stub chapterizer
//! script, a manifest, and the input files the manifest names. Tests drive
//! the real `chapbatch` binary with its working directory set to the fixture.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Stands in for the real chapterizer: echoes to both streams, writes the
/// artifact files named by its flags, and refuses any input matching `*bad*`
/// with exit status 3 before writing anything.
const STUB_CHAPTERIZER: &str = r#"#!/bin/sh
echo "stub argv: $*"
echo "stub stderr" 1>&2
input=""; cue=""; ffmeta=""; matches=""
while [ "$#" -gt 0 ]; do
  case "$1" in
    -i) input="$2"; shift 2 ;;
    --output_cue) cue="$2"; shift 2 ;;
    --output_ffmetadata) ffmeta="$2"; shift 2 ;;
    --write_matches) matches="$2"; shift 2 ;;
    *) shift ;;
  esac
done
case "$input" in
  *bad*) echo "stub: refusing $input" 1>&2; exit 3 ;;
esac
printf 'FILE "%s" MP3\n' "$input" > "$cue"
printf ';FFMETADATA1\n' > "$ffmeta"
printf '{"input":"%s"}\n' "$input" > "$matches"
echo "stub done: $input"
"#;

pub struct BatchFixture {
    dir: TempDir,
    chapterizer: PathBuf,
}

impl Default for BatchFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let chapterizer = dir.path().join("stub-chapterizer");
        fs::write(&chapterizer, STUB_CHAPTERIZER).expect("write stub chapterizer");
        let mut perms = fs::metadata(&chapterizer)
            .expect("stat stub chapterizer")
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&chapterizer, perms).expect("chmod stub chapterizer");
        Self { dir, chapterizer }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write_manifest(&self, text: &str) {
        fs::write(self.path("manifest.txt"), text).expect("write manifest");
    }

    /// Creates an empty input file, plus its parent directory.
    pub fn touch_input(&self, rel: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create input dir");
        }
        fs::write(&path, b"").expect("create input file");
    }

    pub fn write_file(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write file");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap_or_else(|err| panic!("read {rel}: {err}"))
    }

    /// Runs `chapbatch` against `manifest.txt` with outputs under `output/`.
    pub fn run(&self, extra_args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_chapbatch"))
            .current_dir(self.dir.path())
            .arg("--chapterizer")
            .arg(&self.chapterizer)
            .arg("--output-root")
            .arg("output")
            .args(extra_args)
            .arg("manifest.txt")
            .output()
            .expect("run chapbatch")
    }
}
