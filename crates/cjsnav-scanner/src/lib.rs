//! Lexical scanner for CommonJS/JSX source text.
//!
//! This is deliberately not a full JavaScript lexer. The downstream
//! binding extractor only needs identifiers, string literals,
//! punctuation, and — crucially — correct comment and string
//! boundaries, so that require-shaped text inside a comment or string
//! is never misread as executable syntax. Everything else is
//! classified as `Other` and ignored by consumers. JSX constructs need
//! no special treatment: their text decomposes into ordinary tokens
//! that the extractor skips.
//!
//! The scanner never fails. An unterminated string or line comment
//! runs to the end of its line; an unterminated block comment or
//! template literal runs to the end of the file.

use serde::Serialize;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Identifier,
    /// Single- or double-quoted string literal, quotes included.
    String,
    /// Backtick template literal, scanned as one opaque token
    /// (interpolations included).
    Template,
    /// A single punctuation character.
    Punctuation,
    LineComment,
    BlockComment,
    /// Numbers, unrecognized bytes, non-ASCII text.
    Other,
}

/// A token with its byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Start byte offset, inclusive.
    pub start: u32,
    /// End byte offset, exclusive.
    pub end: u32,
}

impl Token {
    /// The token's text within its source.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start as usize..self.end as usize).unwrap_or("")
    }

    /// Half-open containment test.
    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether this token is a comment of either flavor.
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Whether this token is the given punctuation character.
    pub fn is_punct(&self, source: &str, ch: char) -> bool {
        self.kind == TokenKind::Punctuation && self.text(source).starts_with(ch)
    }
}

/// Tokenizer state machine over raw source bytes.
pub struct ScannerState<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ScannerState<'a> {
    pub fn new(source: &'a str) -> Self {
        ScannerState {
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        if self.pos >= self.bytes.len() {
            return None;
        }

        let start = self.pos;
        let ch = self.bytes[self.pos];

        let kind = match ch {
            b'/' if self.peek(1) == Some(b'/') => self.scan_line_comment(),
            b'/' if self.peek(1) == Some(b'*') => self.scan_block_comment(),
            b'\'' | b'"' => self.scan_string(ch),
            b'`' => self.scan_template(),
            _ if is_identifier_start(ch) => self.scan_identifier(),
            _ if ch.is_ascii_digit() => self.scan_number(),
            _ if ch.is_ascii_punctuation() => {
                self.pos += 1;
                TokenKind::Punctuation
            }
            _ => {
                // Non-ASCII byte: consume the whole UTF-8 character so
                // token boundaries stay valid char boundaries.
                self.pos += utf8_len(ch);
                TokenKind::Other
            }
        };

        Some(Token {
            kind,
            start: start as u32,
            end: self.pos as u32,
        })
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.bytes.get(self.pos) {
            if ch == b' ' || ch == b'\t' || ch == b'\r' || ch == b'\n' || ch == 0x0c {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        // Runs to the end of the line, terminator excluded
        let rest = &self.bytes[self.pos..];
        match memchr::memchr2(b'\n', b'\r', rest) {
            Some(found) => self.pos += found,
            None => self.pos = self.bytes.len(),
        }
        TokenKind::LineComment
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        self.pos += 2;
        loop {
            let rest = &self.bytes[self.pos.min(self.bytes.len())..];
            match memchr::memchr(b'*', rest) {
                Some(found) => {
                    self.pos += found + 1;
                    if self.bytes.get(self.pos) == Some(&b'/') {
                        self.pos += 1;
                        break;
                    }
                }
                None => {
                    // Unterminated: rest of file is the comment
                    self.pos = self.bytes.len();
                    break;
                }
            }
        }
        TokenKind::BlockComment
    }

    fn scan_string(&mut self, quote: u8) -> TokenKind {
        self.pos += 1;
        while let Some(&ch) = self.bytes.get(self.pos) {
            match ch {
                b'\\' => {
                    // Escape: skip the backslash and the escaped byte
                    self.pos += 2;
                }
                b'\n' | b'\r' => {
                    // Unterminated: string ends at the line break
                    return TokenKind::String;
                }
                _ if ch == quote => {
                    self.pos += 1;
                    return TokenKind::String;
                }
                _ => self.pos += 1,
            }
        }
        TokenKind::String
    }

    fn scan_template(&mut self) -> TokenKind {
        self.pos += 1;
        while let Some(&ch) = self.bytes.get(self.pos) {
            match ch {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return TokenKind::Template;
                }
                _ => self.pos += 1,
            }
        }
        // Unterminated: rest of file
        TokenKind::Template
    }

    fn scan_identifier(&mut self) -> TokenKind {
        while let Some(&ch) = self.bytes.get(self.pos) {
            if is_identifier_part(ch) {
                self.pos += 1;
            } else {
                break;
            }
        }
        TokenKind::Identifier
    }

    fn scan_number(&mut self) -> TokenKind {
        while let Some(&ch) = self.bytes.get(self.pos) {
            if ch.is_ascii_alphanumeric() {
                self.pos += 1;
            } else {
                break;
            }
        }
        TokenKind::Other
    }
}

/// Tokenize a whole source text.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = ScannerState::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = scanner.next_token() {
        tokens.push(token);
    }
    tokens
}

fn is_identifier_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'$'
}

fn is_identifier_part(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$'
}

fn utf8_len(lead: u8) -> usize {
    match lead {
        0xf0..=0xf7 => 4,
        0xe0..=0xef => 3,
        0xc0..=0xdf => 2,
        _ => 1,
    }
}
