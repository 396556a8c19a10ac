//! External chapterizer invocation and combined-output capture.
//!
//! The tool is a separate executable with a fixed argument contract. Its
//! stdout and stderr share a single pipe, so the interleaving it produced is
//! exactly what reaches the live console and the per-item `.log` file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::unix::io::FromRawFd;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

/// How to reach the external tool; shared by every item in a batch.
#[derive(Debug, Clone)]
pub struct Chapterizer {
    binary: String,
    model_dir: PathBuf,
}

/// Artifact locations for one item inside its output directory.
#[derive(Debug, Clone)]
pub struct ItemPaths {
    /// Structured recognition matches (`<audio_name>.jsonl`).
    pub matches_file: PathBuf,
    /// Cue sheet (`<audio_name>.cue`); gets a published copy.
    pub cue_file: PathBuf,
    /// FFmpeg-style chapter metadata (`<audio_name>.ffmetadata`); gets a
    /// published copy.
    pub ffmetadata_file: PathBuf,
    /// Captured tool output (`<audio_name>.log`).
    pub log_file: PathBuf,
}

impl ItemPaths {
    pub fn new(output_dir: &Path, audio_name: &str) -> Self {
        Self {
            matches_file: output_dir.join(format!("{audio_name}.jsonl")),
            cue_file: output_dir.join(format!("{audio_name}.cue")),
            ffmetadata_file: output_dir.join(format!("{audio_name}.ffmetadata")),
            log_file: output_dir.join(format!("{audio_name}.log")),
        }
    }
}

impl Chapterizer {
    /// `binary` is resolved per invocation, so a missing tool fails the item
    /// rather than the batch.
    pub fn new(binary: impl Into<String>, model_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            model_dir: model_dir.into(),
        }
    }

    /// Builds the fixed argument contract for one input.
    fn command(&self, binary: &Path, input_path: &Path, paths: &ItemPaths) -> Command {
        let mut cmd = Command::new(binary);
        cmd.arg("-vv");
        cmd.arg("--model").arg(&self.model_dir);
        cmd.arg("--write_matches").arg(&paths.matches_file);
        cmd.arg("-i").arg(input_path);
        cmd.arg("--output_cue").arg(&paths.cue_file);
        cmd.arg("--output_ffmetadata").arg(&paths.ffmetadata_file);
        // Full backtraces from the tool keep the captured log actionable.
        cmd.env("RUST_BACKTRACE", "full");
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Runs the tool for one input, mirroring its combined stdout+stderr to
    /// the console while writing the same bytes to `paths.log_file`.
    ///
    /// Launch failures are recorded in the log file before being returned, so
    /// the item's log evidence survives even when the tool never started.
    pub fn run_captured(&self, input_path: &Path, paths: &ItemPaths) -> Result<ExitStatus> {
        let mut log = File::create(&paths.log_file)
            .with_context(|| format!("create {}", paths.log_file.display()))?;
        match self.spawn_and_relay(input_path, paths, &mut log) {
            Ok(status) => Ok(status),
            Err(err) => {
                let _ = writeln!(log, "chapbatch: {err:#}");
                Err(err)
            }
        }
    }

    fn spawn_and_relay(
        &self,
        input_path: &Path,
        paths: &ItemPaths,
        log: &mut File,
    ) -> Result<ExitStatus> {
        let binary = which::which(&self.binary)
            .with_context(|| format!("locate chapterizer binary `{}`", self.binary))?;
        let cmd = self.command(&binary, input_path, paths);

        let start = Instant::now();
        let status = run_teed(cmd, log)?;
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            exit_code = status.code(),
            input = %input_path.display(),
            "chapterizer finished"
        );
        Ok(status)
    }
}

/// Spawns `cmd` with stdout and stderr on one shared pipe and copies that
/// pipe to the console and `log` until the child closes its end.
pub(crate) fn run_teed(mut cmd: Command, log: &mut File) -> Result<ExitStatus> {
    let (mut reader, writer) = combined_pipe()?;
    let writer_for_stderr = writer.try_clone().context("duplicate pipe write end")?;
    cmd.stdout(Stdio::from(writer));
    cmd.stderr(Stdio::from(writer_for_stderr));

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawn {:?}", cmd.get_program()))?;
    // The Command still owns parent copies of the write end; drop them now so
    // the reader sees EOF once the child exits.
    drop(cmd);

    let stdout = std::io::stdout();
    let mut buf = [0u8; 8192];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err).context("read chapterizer output"),
        };
        let chunk = &buf[..n];
        let mut console = stdout.lock();
        console
            .write_all(chunk)
            .context("relay chapterizer output")?;
        console.flush().context("flush console")?;
        log.write_all(chunk).context("write captured log")?;
    }
    log.flush().context("flush captured log")?;

    let status = child.wait().context("wait for chapterizer")?;
    Ok(status)
}

/// One pipe shared by the child's stdout and stderr; the kernel merges the
/// two streams in write order.
fn combined_pipe() -> Result<(File, File)> {
    let mut fds: [libc::c_int; 2] = [0; 2];
    // Safety: fds is a valid out-pointer for two descriptors.
    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error()).context("create capture pipe");
    }
    // Safety: both descriptors were just created and are owned from here on.
    let reader = unsafe { File::from_raw_fd(fds[0]) };
    let writer = unsafe { File::from_raw_fd(fds[1]) };
    Ok((reader, writer))
}
