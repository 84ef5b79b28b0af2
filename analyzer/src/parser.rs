//! Suggestion parsers over analyzer output streams.
//!
//! [`SuggestionParser`] reads a blocking [`BufRead`] as a lazy iterator;
//! [`SuggestionReader`] reads an async stream (the analyzer's stdout).
//! Both consume the stream forward-only and cannot be restarted. Lines are
//! split on raw bytes and decoded lossily: range bodies echo user source,
//! which need not be UTF-8.

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Split};

use earthworm_types::Suggestion;

use crate::protocol::{self, LineMatch, RangeBody};

/// Resolve one classified line. Range headers are handed back so the caller
/// can read their body from the stream.
enum Step {
    Skip,
    Done(Suggestion),
    Body(RangeBody),
}

fn step(line: &str) -> Step {
    match protocol::classify(line) {
        None => Step::Skip,
        Some(Ok(LineMatch::Single(suggestion))) => Step::Done(suggestion),
        Some(Ok(LineMatch::Range(header))) => Step::Body(header.into_body()),
        Some(Err(err)) => {
            tracing::debug!(line, error = %err, "Skipping malformed analyzer line");
            Step::Skip
        }
    }
}

/// Decode one raw output line without its terminator (`\n` or `\r\n`).
fn decode_line(mut raw: Vec<u8>) -> String {
    if raw.last() == Some(&b'\n') {
        raw.pop();
    }
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    match String::from_utf8(raw) {
        Ok(line) => line,
        Err(err) => {
            tracing::debug!("Analyzer output line is not valid UTF-8; decoding lossily");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

fn log_unterminated_body(body: &RangeBody) {
    tracing::debug!(?body, "Analyzer output ended inside a range body; closing it");
}

/// Lazy, single-pass iterator of suggestions over a blocking line stream.
///
/// Yields `Err` once if the underlying reader fails, then ends.
pub struct SuggestionParser<R> {
    reader: R,
    failed: bool,
}

impl<R: BufRead> SuggestionParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            failed: false,
        }
    }

    fn next_line(&mut self) -> Option<io::Result<String>> {
        let mut raw = Vec::new();
        match self.reader.read_until(b'\n', &mut raw) {
            Ok(0) => None,
            Ok(_) => Some(Ok(decode_line(raw))),
            Err(e) => Some(Err(e)),
        }
    }

    fn read_body(&mut self, mut body: RangeBody) -> io::Result<Suggestion> {
        loop {
            match self.next_line() {
                None => {
                    log_unterminated_body(&body);
                    return Ok(body.finish());
                }
                Some(line) => {
                    let line = line?;
                    if line.is_empty() {
                        return Ok(body.finish());
                    }
                    body.push_line(&line);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for SuggestionParser<R> {
    type Item = io::Result<Suggestion>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let line = match self.next_line()? {
                Ok(line) => line,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };

            match step(&line) {
                Step::Skip => {}
                Step::Done(suggestion) => return Some(Ok(suggestion)),
                Step::Body(body) => {
                    let result = self.read_body(body);
                    self.failed = result.is_err();
                    return Some(result);
                }
            }
        }
    }
}

/// Parse complete analyzer output held in memory.
#[must_use]
pub fn parse_output(output: &str) -> Vec<Suggestion> {
    // Reading from a `&[u8]` cannot fail.
    SuggestionParser::new(output.as_bytes())
        .map_while(Result::ok)
        .collect()
}

/// Reads suggestions from an async analyzer output stream.
pub struct SuggestionReader<R> {
    segments: Split<BufReader<R>>,
}

impl<R: AsyncRead + Unpin> SuggestionReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            segments: BufReader::new(reader).split(b'\n'),
        }
    }

    /// Read the next suggestion.
    ///
    /// Returns `Ok(None)` on EOF.
    /// Returns `Err` only when the stream itself fails.
    pub async fn read_suggestion(&mut self) -> Result<Option<Suggestion>> {
        loop {
            let Some(line) = self.next_line().await? else {
                return Ok(None);
            };

            match step(&line) {
                Step::Skip => {}
                Step::Done(suggestion) => return Ok(Some(suggestion)),
                Step::Body(body) => return self.read_body(body).await.map(Some),
            }
        }
    }

    /// Drain the stream, collecting every suggestion.
    pub async fn read_all(&mut self) -> Result<Vec<Suggestion>> {
        let mut suggestions = Vec::new();
        while let Some(suggestion) = self.read_suggestion().await? {
            suggestions.push(suggestion);
        }
        Ok(suggestions)
    }

    async fn read_body(&mut self, mut body: RangeBody) -> Result<Suggestion> {
        loop {
            match self.next_line().await? {
                None => {
                    log_unterminated_body(&body);
                    return Ok(body.finish());
                }
                Some(line) if line.is_empty() => return Ok(body.finish()),
                Some(line) => body.push_line(&line),
            }
        }
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        let segment = self
            .segments
            .next_segment()
            .await
            .context("reading analyzer output")?;
        Ok(segment.map(decode_line))
    }
}
