//! Marker output for the terminal.
//!
//! Suggestion text comes straight from the analyzer's stdout, so it is
//! stripped of escape sequences and control characters before printing.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use earthworm_markers::{MarkerDescriptor, TextDocument, TokenId};

const ESC: char = '\x1b';
const BEL: char = '\x07';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// `file:line: message`, with range bodies indented below.
    #[default]
    Text,
    /// A JSON array of marker objects.
    Json,
}

/// Strip terminal escape sequences and control characters except `\n` and `\t`.
#[must_use]
pub fn sanitize(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_unsafe) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ESC {
            if !is_unsafe(c) {
                out.push(c);
            }
            continue;
        }
        match chars.next() {
            // CSI: parameters and intermediates up to a final byte.
            Some('[') => {
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            // OSC: up to BEL or ESC \.
            Some(']') => {
                while let Some(c) = chars.next() {
                    if c == BEL {
                        break;
                    }
                    if c == ESC && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    Cow::Owned(out)
}

fn is_unsafe(c: char) -> bool {
    (c.is_control() && c != '\n' && c != '\t') || c == ESC
}

#[derive(Debug, Serialize)]
struct MarkerRecord<'a> {
    file: &'a str,
    /// 1-indexed, as editors display it.
    line: u32,
    anchor: &'a str,
    start: usize,
    end: usize,
    icon: &'static str,
    refresh: &'static str,
    text: Cow<'a, str>,
}

fn record<'a>(
    file: &'a str,
    document: &'a TextDocument,
    marker: &'a MarkerDescriptor<TokenId>,
) -> MarkerRecord<'a> {
    MarkerRecord {
        file,
        line: marker.suggestion().line() + 1,
        anchor: document.token_text(*marker.anchor()).unwrap_or(""),
        start: marker.range().start,
        end: marker.range().end,
        icon: marker.icon().as_str(),
        refresh: marker.refresh().as_str(),
        text: sanitize(marker.tooltip()),
    }
}

pub fn write_markers<W: Write>(
    out: &mut W,
    file: &Path,
    document: &TextDocument,
    markers: &[MarkerDescriptor<TokenId>],
    format: Format,
) -> io::Result<()> {
    let file = file.to_string_lossy();

    match format {
        Format::Text => {
            for marker in markers {
                let suggestion = marker.suggestion();
                let summary = sanitize(suggestion.summary());
                writeln!(out, "{file}:{}: {summary}", suggestion.line() + 1)?;
                for body in sanitize(suggestion.text()).lines().skip(1) {
                    writeln!(out, "    {body}")?;
                }
            }
        }
        Format::Json => {
            let records: Vec<_> = markers
                .iter()
                .map(|marker| record(&file, document, marker))
                .collect();
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
