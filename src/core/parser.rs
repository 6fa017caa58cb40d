// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/parser.rs
//!
//! Glossary file parser and serialiser
//!
//! The glossary is a UTF-8 text file with one entry per line:
//!
//! ```text
//! variable::A named storage location.
//! loop::Repeats a block of code::until a condition fails.
//! ```
//!
//! # Rules
//! - Lines are split on the FIRST `::` only, so a definition may itself
//!   contain `::` and still round-trip.
//! - Both halves are trimmed. A later duplicate term overwrites an earlier one.
//! - Blank lines are ignored. Lines without a delimiter, or with a blank
//!   term or definition, are skipped and reported as `MalformedLine`s.
//!   Parsing never aborts.
//!
//! Serialisation replaces embedded CR/LF with a space so the written file
//! stays strictly one entry per line.

use nom::{
    bytes::complete::{tag, take_until},
    combinator::rest,
    IResult, Parser,
};

use crate::core::types::{MalformedLine, MalformedReason, TermCollection, DELIMITER};

/// Result of parsing a glossary file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedGlossary {
    /// Successfully parsed entries
    pub terms: TermCollection,
    /// Lines that were skipped, in file order
    pub malformed: Vec<MalformedLine>,
}

/// Parse a complete glossary file
///
/// Never fails: malformed lines are collected in `ParsedGlossary::malformed`
/// and the remaining lines are still parsed.
///
/// # Example
/// ```
/// use termbook::core::parser::parse_glossary;
///
/// let parsed = parse_glossary("loop::repeats code\nnot an entry\n");
/// assert_eq!(parsed.terms.get("loop"), Some("repeats code"));
/// assert_eq!(parsed.malformed.len(), 1);
/// ```
pub fn parse_glossary(content: &str) -> ParsedGlossary {
    let mut parsed = ParsedGlossary::default();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1; // Human-readable numbers start at 1

        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        match parse_entry_line(line_trimmed) {
            Ok((_, (term, definition))) => {
                let term = term.trim();
                let definition = definition.trim();

                if term.is_empty() || definition.is_empty() {
                    parsed.malformed.push(MalformedLine {
                        line: line_num,
                        content: line_trimmed.to_string(),
                        reason: MalformedReason::EmptyField,
                    });
                    continue;
                }

                // Last occurrence wins
                parsed.terms.insert(term, definition);
            }
            Err(_) => {
                parsed.malformed.push(MalformedLine {
                    line: line_num,
                    content: line_trimmed.to_string(),
                    reason: MalformedReason::MissingDelimiter,
                });
            }
        }
    }

    parsed
}

/// Parse a single entry line into its raw (untrimmed) term and definition
///
/// Format: TERM::DEFINITION
///
/// Splits on the first delimiter. Everything after it, including further
/// delimiters, belongs to the definition.
pub fn parse_entry_line(input: &str) -> IResult<&str, (&str, &str)> {
    let result: IResult<&str, (&str, &str, &str)> =
        (take_until(DELIMITER), tag(DELIMITER), rest).parse(input);
    let (input, (term, _, definition)) = result?;

    Ok((input, (term, definition)))
}

/// Replace embedded line breaks with a single space
///
/// A CRLF pair counts as one break.
pub fn sanitize_field(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Serialise a collection into the on-disk format
///
/// One `term::definition` line per entry, each terminated by `\n`, in term
/// order.
pub fn serialize_glossary(terms: &TermCollection) -> String {
    let mut output = String::new();

    for (term, definition) in terms {
        output.push_str(&sanitize_field(term));
        output.push_str(DELIMITER);
        output.push_str(&sanitize_field(definition));
        output.push('\n');
    }

    output
}
