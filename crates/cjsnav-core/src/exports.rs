//! Export-member location.
//!
//! Scans a target file for the assignment that defines a given member
//! on the module's export object. Recognized shapes:
//!
//! - `exports.NAME = …`
//! - `module.exports.NAME = …`
//! - keys inside a `module.exports = { … }` object literal
//!
//! Assignment forms return the identifier's full span. Inside an
//! export object literal, shorthand and quoted keys return the key
//! token's span, but an unquoted key with an explicit value collapses
//! to a zero-width anchor at the key's start. The collapse is a
//! preserved inconsistency of the system this engine reimplements,
//! kept deliberately rather than silently corrected.

use cjsnav_common::{LineMap, Range};
use cjsnav_scanner::{Token, TokenKind, tokenize};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

/// A member definition discovered on a module's export surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDefinition {
    pub member_name: String,
    pub range: Range,
}

/// All export definitions of one file, in order of appearance.
/// When a member is defined more than once, the first definition
/// wins.
pub struct ExportScan {
    definitions: IndexMap<String, ExportDefinition>,
}

impl ExportScan {
    pub fn new(source: &str) -> Self {
        let tokens = tokenize(source);
        let code: Vec<Token> = tokens.into_iter().filter(|t| !t.is_comment()).collect();
        let line_map = LineMap::build(source);

        let mut walker = ExportWalker {
            source,
            code: &code,
            line_map: &line_map,
            definitions: IndexMap::new(),
        };
        walker.run();

        ExportScan {
            definitions: walker.definitions,
        }
    }

    /// The definition range for a member, if one was discovered.
    pub fn find(&self, member_name: &str) -> Option<Range> {
        let found = self.definitions.get(member_name).map(|d| d.range);
        if found.is_none() {
            trace!(member_name, "member not found in export scan");
        }
        found
    }

    /// All discovered definitions in insertion order.
    pub fn definitions(&self) -> impl Iterator<Item = &ExportDefinition> {
        self.definitions.values()
    }
}

struct ExportWalker<'a> {
    source: &'a str,
    code: &'a [Token],
    line_map: &'a LineMap,
    definitions: IndexMap<String, ExportDefinition>,
}

impl<'a> ExportWalker<'a> {
    fn text(&self, idx: usize) -> &'a str {
        self.code.get(idx).map(|t| t.text(self.source)).unwrap_or("")
    }

    fn is_punct(&self, idx: usize, ch: char) -> bool {
        self.code
            .get(idx)
            .map(|t| t.is_punct(self.source, ch))
            .unwrap_or(false)
    }

    fn is_identifier(&self, idx: usize) -> bool {
        self.code
            .get(idx)
            .map(|t| t.kind == TokenKind::Identifier)
            .unwrap_or(false)
    }

    fn run(&mut self) {
        let mut i = 0;
        while i < self.code.len() {
            if self.is_identifier(i) {
                match self.text(i) {
                    // `exports.NAME = …` (not the tail of
                    // `module.exports`, which is handled below)
                    "exports" if i == 0 || !self.is_punct(i - 1, '.') => {
                        if let Some(next) = self.match_member_assignment(i + 1) {
                            i = next;
                            continue;
                        }
                    }
                    "module" if self.is_punct(i + 1, '.') && self.text(i + 2) == "exports" => {
                        // `module.exports.NAME = …`
                        if let Some(next) = self.match_member_assignment(i + 3) {
                            i = next;
                            continue;
                        }
                        // `module.exports = { … }`
                        if self.is_punct(i + 3, '=') && self.is_punct(i + 4, '{') {
                            i = self.walk_object_literal(i + 5);
                            continue;
                        }
                    }
                    _ => {}
                }
            }
            i += 1;
        }
    }

    /// Match `.NAME = …` starting at the `.` index; records the
    /// definition and returns the index after `=`.
    fn match_member_assignment(&mut self, dot_idx: usize) -> Option<usize> {
        if !self.is_punct(dot_idx, '.') || !self.is_identifier(dot_idx + 1) {
            return None;
        }
        // Single `=`: assignment, not comparison
        if !self.is_punct(dot_idx + 2, '=') || self.is_punct(dot_idx + 3, '=') {
            return None;
        }

        let name_tok = self.code[dot_idx + 1];
        let name = name_tok.text(self.source).to_string();
        let range = self
            .line_map
            .span_to_range(name_tok.start, name_tok.end, self.source);
        self.record(name, range);
        Some(dot_idx + 3)
    }

    /// Walk the keys of `module.exports = { … }` starting at the
    /// first token inside the brace; returns the index after the
    /// closing brace.
    fn walk_object_literal(&mut self, start: usize) -> usize {
        let mut i = start;
        let mut depth = 0usize;
        let mut expect_key = true;

        while let Some(tok) = self.code.get(i).copied() {
            if tok.kind == TokenKind::Punctuation {
                match tok.text(self.source) {
                    "{" | "(" | "[" => depth += 1,
                    "}" => {
                        if depth == 0 {
                            return i + 1;
                        }
                        depth -= 1;
                    }
                    ")" | "]" => depth = depth.saturating_sub(1),
                    "," if depth == 0 => expect_key = true,
                    _ => {}
                }
                i += 1;
                continue;
            }

            if depth == 0 && expect_key {
                match tok.kind {
                    TokenKind::Identifier => {
                        if self.is_punct(i + 1, ':') {
                            // Unquoted key with a value: zero-width
                            // anchor at the key start
                            let anchor = self
                                .line_map
                                .span_to_range(tok.start, tok.start, self.source);
                            self.record(tok.text(self.source).to_string(), anchor);
                        } else {
                            // Shorthand key: full span
                            let range = self
                                .line_map
                                .span_to_range(tok.start, tok.end, self.source);
                            self.record(tok.text(self.source).to_string(), range);
                        }
                        expect_key = false;
                    }
                    TokenKind::String => {
                        if self.is_punct(i + 1, ':') {
                            // Quoted key: full token span, quotes
                            // included
                            let range = self
                                .line_map
                                .span_to_range(tok.start, tok.end, self.source);
                            let name = strip_quotes(tok.text(self.source)).to_string();
                            self.record(name, range);
                        }
                        expect_key = false;
                    }
                    _ => expect_key = false,
                }
            }
            i += 1;
        }
        i
    }

    fn record(&mut self, name: String, range: Range) {
        self.definitions
            .entry(name.clone())
            .or_insert(ExportDefinition {
                member_name: name,
                range,
            });
    }
}

fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix(['\'', '"']).unwrap_or(text);
    text.strip_suffix(['\'', '"']).unwrap_or(text)
}
