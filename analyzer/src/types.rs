//! Public types consumed by the CLI and host integrations.
//!
//! Callers construct an [`AnalyzerConfig`] (usually from the `[analyzer]`
//! config table) and receive an [`AnalysisReport`] per run.

use serde::Deserialize;

use earthworm_types::Suggestion;

const DEFAULT_INTERPRETER: &str = "python";
const DEFAULT_MODULE: &str = "src.decomposer";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_string()
}

fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// How to invoke the analyzer.
///
/// The command line is `<interpreter><version> -m <module> <file> <flags...>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyzerConfig {
    /// Interpreter executable without version suffix (e.g. "python").
    #[serde(default = "default_interpreter")]
    interpreter: String,
    /// Default version selector appended to the interpreter (e.g. "3").
    #[serde(default)]
    version: String,
    /// Module run with `-m`. Empty runs the file directly.
    #[serde(default = "default_module")]
    module: String,
    /// Analyzer installation root, exported as `PYTHONPATH`.
    #[serde(default)]
    home: Option<String>,
    /// Extra arguments appended after the file path.
    #[serde(default)]
    flags: Vec<String>,
    /// Kill the analyzer after this many seconds. 0 disables the limit.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            version: String::new(),
            module: default_module(),
            home: None,
            flags: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AnalyzerConfig {
    #[must_use]
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn home(&self) -> Option<&str> {
        self.home.as_deref()
    }

    #[must_use]
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_home(mut self, home: Option<String>) -> Self {
        self.home = home;
        self
    }

    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Executable name for a run, e.g. `python3`.
    ///
    /// An explicit `version` overrides the configured default.
    #[must_use]
    pub fn program(&self, version: Option<&str>) -> String {
        let version = version.unwrap_or(&self.version);
        format!("{}{}", self.interpreter, version)
    }
}

/// Outcome of one analyzer run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    suggestions: Vec<Suggestion>,
    /// The analyzer was killed before its output ended.
    truncated: bool,
    /// Process exit code; `None` when killed by a signal or timed out.
    exit_code: Option<i32>,
}

impl AnalysisReport {
    pub(crate) fn new(suggestions: Vec<Suggestion>, truncated: bool, exit_code: Option<i32>) -> Self {
        Self {
            suggestions,
            truncated,
            exit_code,
        }
    }

    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    #[must_use]
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.suggestions
    }

    #[must_use]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Whether the analyzer ran to completion and exited successfully.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.truncated && self.exit_code == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_config_defaults() {
        let config: AnalyzerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.interpreter(), "python");
        assert_eq!(config.module(), "src.decomposer");
        assert_eq!(config.timeout_secs(), 60);
        assert!(config.home().is_none());
        assert!(config.flags().is_empty());
    }

    #[test]
    fn test_analyzer_config_full() {
        let json = serde_json::json!({
            "interpreter": "pypy",
            "version": "3",
            "module": "earthworm.main",
            "home": "/opt/earthworm",
            "flags": ["--noprogress", "--slow"],
            "timeout_secs": 5
        });
        let config: AnalyzerConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.program(None), "pypy3");
        assert_eq!(config.module(), "earthworm.main");
        assert_eq!(config.home(), Some("/opt/earthworm"));
        assert_eq!(config.flags(), ["--noprogress", "--slow"]);
        assert_eq!(config.timeout_secs(), 5);
    }

    #[test]
    fn test_program_version_override() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.program(None), "python");
        assert_eq!(config.program(Some("3")), "python3");
        assert_eq!(config.program(Some("3.11")), "python3.11");
    }

    #[test]
    fn test_report_is_clean() {
        assert!(AnalysisReport::new(vec![], false, Some(0)).is_clean());
        assert!(!AnalysisReport::new(vec![], true, None).is_clean());
        assert!(!AnalysisReport::new(vec![], false, Some(2)).is_clean());
    }
}
