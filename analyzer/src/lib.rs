//! Earthworm analyzer client: runs the analyzer and parses its findings.

pub mod parser;
pub mod protocol;
pub mod types;

mod runner;

pub use parser::{SuggestionParser, SuggestionReader, parse_output};
pub use protocol::{LineMatch, MalformedLine, classify, is_range_header, is_single_line_finding};
pub use runner::AnalyzerRunner;
pub use types::{AnalysisReport, AnalyzerConfig};
