//! Earthworm output protocol.
//!
//! The analyzer reports findings as plain text on stdout. Two line shapes
//! carry a finding; every other line (banners, progress output, blank
//! separators) is ignored.
//!
//! ```text
//! \tline 5: unused variable            <- single-line finding
//! line 10-14 (duplicated logic):       <- range header
//! do_a()                               <- body, copied verbatim
//! do_b()
//!                                      <- blank line ends the body
//! ```
//!
//! Line numbers on the wire are 1-indexed; [`Suggestion`]s are 0-indexed.

use std::sync::OnceLock;

use regex::Regex;

use earthworm_types::Suggestion;

/// A line that looked like a finding but carried an unusable line number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedLine {
    #[error("line number {raw:?} is not a valid decimal line number")]
    InvalidNumber { raw: String },
    #[error("line numbers are 1-indexed, got 0")]
    ZeroLine,
}

/// Classification of one line of analyzer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    /// A complete single-line finding.
    Single(Suggestion),
    /// The header of a range finding; its body follows on the next lines.
    Range(RangeHeader),
}

/// Header of a multi-line range finding (`line A-B (description):`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeHeader {
    /// 1-indexed first line, as reported.
    start: u32,
    /// 1-indexed last line, as reported.
    end: u32,
}

impl RangeHeader {
    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Begin accumulating the body that follows this header.
    #[must_use]
    pub fn into_body(self) -> RangeBody {
        RangeBody {
            line: self.start - 1,
            text: format!(
                "Refactor lines {}-{} into new function: \n",
                self.start, self.end
            ),
        }
    }
}

/// Text of a range finding while its body lines are being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBody {
    line: u32,
    text: String,
}

impl RangeBody {
    pub fn push_line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    #[must_use]
    pub fn finish(self) -> Suggestion {
        Suggestion::new(self.line, self.text)
    }
}

struct FindingPatterns {
    single_line: Regex,
    range_header: Regex,
}

static FINDING_PATTERNS: OnceLock<FindingPatterns> = OnceLock::new();

fn patterns() -> &'static FindingPatterns {
    FINDING_PATTERNS.get_or_init(|| FindingPatterns {
        single_line: Regex::new(r"^\tline (\d+): .*$").expect("valid single-line finding regex"),
        range_header: Regex::new(r"^line (\d+)-(\d+) \([^)]*\):$")
            .expect("valid range header regex"),
    })
}

/// Whether `line` has the shape of a single-line finding (`\tline N: text`).
#[must_use]
pub fn is_single_line_finding(line: &str) -> bool {
    patterns().single_line.is_match(line)
}

/// Whether `line` has the shape of a range header (`line A-B (description):`).
#[must_use]
pub fn is_range_header(line: &str) -> bool {
    patterns().range_header.is_match(line)
}

/// Classify one line of analyzer output.
///
/// The single-line shape is tested first, then the range header. Returns
/// `None` for lines that match neither, and `Some(Err(_))` for lines that
/// match a shape but whose line number cannot be used.
#[must_use]
pub fn classify(line: &str) -> Option<Result<LineMatch, MalformedLine>> {
    let patterns = patterns();

    if let Some(caps) = patterns.single_line.captures(line) {
        return Some(single_line_match(line, &caps[1]));
    }

    if let Some(caps) = patterns.range_header.captures(line) {
        return Some(range_match(&caps[1], &caps[2]));
    }

    None
}

fn single_line_match(line: &str, raw_number: &str) -> Result<LineMatch, MalformedLine> {
    let reported = parse_reported_line(raw_number)?;
    // The pattern guarantees a colon after the number; the message is
    // everything past it, leading space included.
    let text = line.split_once(':').map_or("", |(_, rest)| rest);
    Ok(LineMatch::Single(Suggestion::new(reported - 1, text)))
}

fn range_match(raw_start: &str, raw_end: &str) -> Result<LineMatch, MalformedLine> {
    let start = parse_reported_line(raw_start)?;
    let end = parse_decimal(raw_end)?;
    Ok(LineMatch::Range(RangeHeader { start, end }))
}

/// Parse a 1-indexed line number, rejecting 0.
fn parse_reported_line(raw: &str) -> Result<u32, MalformedLine> {
    match parse_decimal(raw)? {
        0 => Err(MalformedLine::ZeroLine),
        n => Ok(n),
    }
}

fn parse_decimal(raw: &str) -> Result<u32, MalformedLine> {
    raw.parse().map_err(|_| MalformedLine::InvalidNumber {
        raw: raw.to_string(),
    })
}
