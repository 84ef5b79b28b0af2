//! Analyzer invocation — spawns the analyzer and parses its stdout.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;

use earthworm_types::Suggestion;

use crate::parser::SuggestionReader;
use crate::types::{AnalysisReport, AnalyzerConfig};

/// Runs the analyzer on one file at a time.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerRunner {
    config: AnalyzerConfig,
}

impl AnalyzerRunner {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn args(&self, file: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(self.config.flags().len() + 3);
        if !self.config.module().is_empty() {
            args.push(OsString::from("-m"));
            args.push(OsString::from(self.config.module()));
        }
        args.push(file.as_os_str().to_owned());
        args.extend(self.config.flags().iter().map(OsString::from));
        args
    }

    fn timeout(&self) -> Option<Duration> {
        match self.config.timeout_secs() {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    fn command(&self, program: &str, file: &Path) -> Result<Command> {
        let resolved = which::which(program).with_context(|| format!("{program} not found in PATH"))?;
        let mut cmd = Command::new(resolved);
        cmd.args(self.args(file))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(home) = self.config.home() {
            cmd.env("PYTHONPATH", home);
        }
        Ok(cmd)
    }

    /// Run the analyzer on `file` and collect its suggestions.
    ///
    /// `version` overrides the configured interpreter version (e.g. `"3"`).
    /// A non-zero exit is reported in the [`AnalysisReport`], not as an error.
    /// On timeout the analyzer is killed and the suggestions read so far are
    /// returned with [`AnalysisReport::truncated`] set.
    ///
    /// Returns `Err` if the analyzer cannot be started or its output stream fails.
    pub async fn run(&self, file: &Path, version: Option<&str>) -> Result<AnalysisReport> {
        let program = self.config.program(version);
        let mut child = self
            .command(&program, file)?
            .spawn()
            .with_context(|| format!("spawning {program}"))?;
        tracing::info!(program = %program, file = %file.display(), "Running analyzer");

        let stdout = child.stdout.take().context("no stdout from analyzer")?;
        let mut reader = SuggestionReader::new(stdout);
        let mut suggestions = Vec::new();

        let outcome = {
            let work = async {
                while let Some(suggestion) = reader.read_suggestion().await? {
                    suggestions.push(suggestion);
                }
                child.wait().await.context("waiting for analyzer")
            };
            match self.timeout() {
                Some(limit) => tokio::time::timeout(limit, work).await.ok(),
                None => Some(work.await),
            }
        };

        let (truncated, exit_code) = match outcome {
            Some(status) => (false, status?.code()),
            None => {
                tracing::warn!(
                    program = %program,
                    file = %file.display(),
                    parsed = suggestions.len(),
                    "Analyzer timed out; keeping partial output"
                );
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill analyzer: {e}");
                }
                (true, None)
            }
        };

        match exit_code {
            Some(0) | None => {}
            Some(code) => {
                tracing::warn!(program = %program, code, "Analyzer exited with non-zero status");
            }
        }

        tracing::debug!(count = suggestions.len(), "Analyzer run finished");
        Ok(AnalysisReport::new(suggestions, truncated, exit_code))
    }

    /// Like [`run`](Self::run), but failures degrade to no suggestions.
    pub async fn run_or_empty(&self, file: &Path, version: Option<&str>) -> Vec<Suggestion> {
        match self.run(file, version).await {
            Ok(report) => report.into_suggestions(),
            Err(e) => {
                tracing::warn!(file = %file.display(), "Earthworm unable to run: {e:#}");
                Vec::new()
            }
        }
    }
}
