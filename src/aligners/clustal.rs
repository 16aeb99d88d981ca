use super::{
    clustal_format::{parse_blocked_alignment, write_labeled_fasta},
    ArtifactToken, MsaProfile, MultipleAligner, MultipleAlignment,
};
use crate::strcon::LocusError;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};
use tempfile::TempDir;

#[derive(Debug, Clone)]
pub struct ClustalConfig {
    pub executable: PathBuf,
    /// Wall-clock budget for one engine invocation.
    pub timeout: Duration,
    /// Parent directory for per-call scratch directories; system temp dir if unset.
    pub work_dir: Option<PathBuf>,
}

impl Default for ClustalConfig {
    fn default() -> Self {
        ClustalConfig {
            executable: PathBuf::from("clustalw2"),
            timeout: Duration::from_secs(300),
            work_dir: None,
        }
    }
}

/// Runs ClustalW as a subprocess. Every call gets its own scratch directory,
/// removed when the call returns on any path.
#[derive(Debug, Clone)]
pub struct ClustalAligner {
    config: ClustalConfig,
}

impl ClustalAligner {
    pub fn new(config: ClustalConfig) -> Self {
        ClustalAligner { config }
    }

    fn engine_name(&self) -> String {
        self.config.executable.display().to_string()
    }

    fn engine_failure(&self, reason: String) -> LocusError {
        LocusError::EngineFailure {
            engine: self.engine_name(),
            reason,
        }
    }

    fn create_workspace(&self, token: &ArtifactToken) -> Result<TempDir, LocusError> {
        let prefix = format!("strcon-{}-", token.stem());
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let workspace = match &self.config.work_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        };
        workspace.map_err(|e| self.engine_failure(format!("cannot create scratch directory: {}", e)))
    }

    fn build_command(&self, input: &Path, output: &Path, profile: MsaProfile) -> Command {
        let mut command = Command::new(&self.config.executable);
        command
            .arg(format!("-INFILE={}", input.display()))
            .arg(format!("-OUTFILE={}", output.display()))
            .arg("-OUTPUT=CLUSTAL")
            .arg("-OUTORDER=INPUT")
            .arg("-QUIET");
        if profile == MsaProfile::Reference {
            command.args([
                "-ENDGAPS",
                "-GAPOPEN=8",
                "-PAIRGAP=5",
                "-PWGAPOPEN=8",
                "-GAPEXT=0.0",
            ]);
        }
        command
    }
}

impl MultipleAligner for ClustalAligner {
    fn align(
        &mut self,
        seqs: &[(String, &str)],
        profile: MsaProfile,
        token: &ArtifactToken,
    ) -> Result<MultipleAlignment, LocusError> {
        let workspace = self.create_workspace(token)?;
        let input_path = workspace.path().join("input.fa");
        let output_path = workspace.path().join("input.aln");
        let stderr_path = workspace.path().join("stderr.log");

        write_labeled_fasta(&input_path, seqs)
            .map_err(|e| self.engine_failure(format!("cannot write input: {}", e)))?;
        let stderr_file = File::create(&stderr_path)
            .map_err(|e| self.engine_failure(format!("cannot capture stderr: {}", e)))?;

        let mut command = self.build_command(&input_path, &output_path, profile);
        command
            .current_dir(workspace.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(stderr_file);
        log::trace!("{}: running {:?}", token.locus_id, command);

        let mut child = command
            .spawn()
            .map_err(|e| self.engine_failure(format!("cannot start: {}", e)))?;
        let status = match wait_with_timeout(&mut child, self.config.timeout)
            .map_err(|e| self.engine_failure(format!("cannot wait for process: {}", e)))?
        {
            Some(status) => status,
            None => {
                return Err(LocusError::EngineTimeout {
                    engine: self.engine_name(),
                    seconds: self.config.timeout.as_secs(),
                })
            }
        };

        if !status.success() {
            let stderr = fs::read_to_string(&stderr_path).unwrap_or_default();
            return Err(self.engine_failure(format!("{}: {}", status, stderr.trim())));
        }

        let text = fs::read_to_string(&output_path)
            .map_err(|e| self.engine_failure(format!("no alignment output: {}", e)))?;
        parse_blocked_alignment(&text)
    }
}

/// Waits for `child` until `timeout` elapses; an expired child is killed and
/// reaped, and `None` is returned.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    const POLL_INTERVAL: Duration = Duration::from_millis(10);
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            // The child may exit between the poll and the kill
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
