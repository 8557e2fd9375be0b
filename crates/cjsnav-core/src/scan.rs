//! Per-file scan state: scope tree, require bindings, inline
//! require calls.
//!
//! A [`FileScan`] is built once per file version from the token
//! stream and answers all position queries for that file. Recognition
//! is a closed match over the declaration shapes the engine supports:
//!
//! 1. `const|let|var NAME = require('path')`
//! 2. `const|let|var { a, b: c } = require('path')` (any number of
//!    lines, trailing commas and interleaved comments included)
//! 3. inline `require('path')` used directly as an expression,
//!    optionally followed by a chained `.member`
//!
//! Anything else — computed paths, array patterns, rest elements —
//! is deliberately left unrecognized and falls through to "no
//! result" rather than a guess.

use cjsnav_common::LineMap;
use cjsnav_scanner::{Token, TokenKind, tokenize};
use tracing::trace;

/// Identifies the file top-level scope (id 0) or a nested function
/// body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const TOP: ScopeId = ScopeId(0);
}

/// A lexical scope: the file top level or one function/arrow body.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Back-reference to the enclosing scope; `None` for the top level.
    pub parent: Option<ScopeId>,
    /// Byte range of the scope body (brace to matching brace).
    pub start: u32,
    pub end: u32,
}

/// A local name bound by a require-based declaration.
#[derive(Debug, Clone)]
pub struct RequireBinding {
    pub local_name: String,
    pub module_path: String,
    /// Set only for destructured property bindings.
    pub member_name: Option<String>,
    /// Byte span of the whole declaration, keyword through `)`.
    pub decl_start: u32,
    pub decl_end: u32,
    /// Byte span of the local name token at the declaration site.
    pub name_start: u32,
    pub name_end: u32,
    /// Byte span of the destructured property token (same as the name
    /// span unless the property was aliased).
    pub prop_start: u32,
    pub prop_end: u32,
    pub scope: ScopeId,
}

/// An unbound `require('path')` used directly as an expression.
#[derive(Debug, Clone)]
pub struct InlineRequire {
    pub module_path: String,
    /// Byte span of the call, `require` through `)`.
    pub call_start: u32,
    pub call_end: u32,
    /// A `.member` chained directly onto the call, if any.
    pub member: Option<InlineMember>,
}

#[derive(Debug, Clone)]
pub struct InlineMember {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

/// How a query position landed inside a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclHit {
    /// On the local name or destructured property token itself.
    Name,
    /// Anywhere else in the declaration (keyword, `require`, the
    /// path string).
    Whole,
}

/// Scan result for one file version.
pub struct FileScan {
    tokens: Vec<Token>,
    /// Indices into `tokens` of the non-comment tokens.
    code: Vec<usize>,
    scopes: Vec<Scope>,
    bindings: Vec<RequireBinding>,
    inline_requires: Vec<InlineRequire>,
    line_map: LineMap,
}

const DECLARATION_KEYWORDS: &[&str] = &["const", "let", "var"];

/// Keywords whose parenthesized head is followed by a block, not a
/// function body.
const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "with"];

impl FileScan {
    pub fn new(source: &str) -> Self {
        let tokens = tokenize(source);
        let code: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_comment())
            .map(|(i, _)| i)
            .collect();
        let line_map = LineMap::build(source);

        let mut extractor = Extractor {
            source,
            tokens: &tokens,
            code: &code,
            scopes: vec![Scope {
                parent: None,
                start: 0,
                end: source.len() as u32,
            }],
            scope_stack: vec![ScopeId::TOP],
            brace_stack: Vec::new(),
            bindings: Vec::new(),
            inline_requires: Vec::new(),
        };
        extractor.run();

        trace!(
            bindings = extractor.bindings.len(),
            scopes = extractor.scopes.len(),
            inline = extractor.inline_requires.len(),
            "file scan complete"
        );

        FileScan {
            scopes: extractor.scopes,
            bindings: extractor.bindings,
            inline_requires: extractor.inline_requires,
            tokens,
            code,
            line_map,
        }
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    pub fn bindings(&self) -> &[RequireBinding] {
        &self.bindings
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn inline_requires(&self) -> &[InlineRequire] {
        &self.inline_requires
    }

    /// The identifier token under the caret. Both word boundaries
    /// count as "on" the word, matching editor conventions.
    pub fn identifier_at(&self, offset: u32) -> Option<usize> {
        self.code.iter().position(|&i| {
            let t = &self.tokens[i];
            t.kind == TokenKind::Identifier && t.start <= offset && offset <= t.end
        })
    }

    /// Token at a code index (as returned by [`Self::identifier_at`]).
    pub fn code_token(&self, code_idx: usize) -> Option<&Token> {
        self.code.get(code_idx).map(|&i| &self.tokens[i])
    }

    /// The innermost scope containing a byte offset.
    pub fn scope_at(&self, offset: u32) -> ScopeId {
        let mut best = 0usize;
        for (idx, scope) in self.scopes.iter().enumerate().skip(1) {
            if scope.start <= offset && offset < scope.end && scope.start >= self.scopes[best].start
            {
                best = idx;
            }
        }
        ScopeId(best as u32)
    }

    /// Look up a name through the scope chain at a position. Inner
    /// bindings shadow outer ones for positions inside their scope.
    pub fn lookup_binding(&self, name: &str, offset: u32) -> Option<&RequireBinding> {
        let mut scope = self.scope_at(offset);
        loop {
            let found = self
                .bindings
                .iter()
                .rev()
                .find(|b| b.scope == scope && b.local_name == name);
            if found.is_some() {
                return found;
            }
            scope = self.scopes[scope.0 as usize].parent?;
        }
    }

    /// The binding whose declaration contains this offset, if any,
    /// together with how precisely the offset landed.
    pub fn binding_decl_at(&self, offset: u32) -> Option<(&RequireBinding, DeclHit)> {
        for b in &self.bindings {
            let on_name = b.name_start <= offset && offset <= b.name_end;
            let on_prop = b.prop_start <= offset && offset <= b.prop_end;
            if on_name || on_prop {
                return Some((b, DeclHit::Name));
            }
        }
        self.bindings
            .iter()
            .find(|b| b.decl_start <= offset && offset <= b.decl_end)
            .map(|b| (b, DeclHit::Whole))
    }

    /// The inline require call containing this offset. The returned
    /// flag is true when the offset sits on the chained member name.
    pub fn inline_require_at(&self, offset: u32) -> Option<(&InlineRequire, bool)> {
        for r in &self.inline_requires {
            if let Some(member) = &r.member {
                if member.start <= offset && offset <= member.end {
                    return Some((r, true));
                }
            }
            if r.call_start <= offset && offset <= r.call_end {
                return Some((r, false));
            }
        }
        None
    }
}

struct Extractor<'a> {
    source: &'a str,
    tokens: &'a [Token],
    code: &'a [usize],
    scopes: Vec<Scope>,
    scope_stack: Vec<ScopeId>,
    /// One entry per open `{`: the scope it opened, or `None` for
    /// object literals and statement blocks.
    brace_stack: Vec<Option<ScopeId>>,
    bindings: Vec<RequireBinding>,
    inline_requires: Vec<InlineRequire>,
}

impl<'a> Extractor<'a> {
    fn tok(&self, code_idx: usize) -> Option<&Token> {
        self.code.get(code_idx).map(|&i| &self.tokens[i])
    }

    fn text(&self, code_idx: usize) -> &'a str {
        self.tok(code_idx).map(|t| t.text(self.source)).unwrap_or("")
    }

    fn is_punct(&self, code_idx: usize, ch: char) -> bool {
        self.tok(code_idx)
            .map(|t| t.is_punct(self.source, ch))
            .unwrap_or(false)
    }

    fn is_identifier(&self, code_idx: usize) -> bool {
        self.tok(code_idx)
            .map(|t| t.kind == TokenKind::Identifier)
            .unwrap_or(false)
    }

    fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().unwrap_or(&ScopeId::TOP)
    }

    fn run(&mut self) {
        let mut i = 0;
        while i < self.code.len() {
            let tok = self.tokens[self.code[i]];
            match tok.kind {
                TokenKind::Punctuation => {
                    if tok.is_punct(self.source, '{') {
                        self.open_brace(i, &tok);
                    } else if tok.is_punct(self.source, '}') {
                        self.close_brace(&tok);
                    }
                    i += 1;
                }
                TokenKind::Identifier => {
                    let text = tok.text(self.source);
                    if DECLARATION_KEYWORDS.contains(&text) {
                        i = self.parse_declaration(i);
                    } else if text == "require" {
                        i = self.parse_inline_require(i);
                    } else {
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }
    }

    fn open_brace(&mut self, i: usize, tok: &Token) {
        let opened = if self.is_function_body_brace(i) {
            let id = ScopeId(self.scopes.len() as u32);
            self.scopes.push(Scope {
                parent: Some(self.current_scope()),
                start: tok.start,
                end: self.source.len() as u32,
            });
            self.scope_stack.push(id);
            Some(id)
        } else {
            None
        };
        self.brace_stack.push(opened);
    }

    fn close_brace(&mut self, tok: &Token) {
        if let Some(opened) = self.brace_stack.pop().flatten() {
            self.scopes[opened.0 as usize].end = tok.end;
            self.scope_stack.pop();
        }
    }

    /// Classify a `{` by look-behind: does it open a function body?
    ///
    /// `=> {` always does. `) {` does unless the matching `(` belongs
    /// to a control-flow head. Everything else (object literals,
    /// `else`/`try`/bare blocks, class bodies) stays in the enclosing
    /// scope — only function bodies shadow.
    fn is_function_body_brace(&self, i: usize) -> bool {
        if i == 0 {
            return false;
        }

        // Arrow body: `=>` scans as adjacent `=` `>` tokens
        if self.is_punct(i - 1, '>')
            && i >= 2
            && self.is_punct(i - 2, '=')
            && self.tok(i - 2).map(|t| t.end) == self.tok(i - 1).map(|t| t.start)
        {
            return true;
        }

        if !self.is_punct(i - 1, ')') {
            return false;
        }

        // Walk back to the matching `(`
        let mut depth = 1usize;
        let mut j = i - 1;
        while j > 0 {
            j -= 1;
            if self.is_punct(j, ')') {
                depth += 1;
            } else if self.is_punct(j, '(') {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
        if depth != 0 {
            return false;
        }
        if j == 0 {
            // `(` at the very start of the file: parenthesized
            // function expression
            return true;
        }

        let before = self.tok(j - 1);
        match before {
            Some(t) if t.kind == TokenKind::Identifier => {
                let text = t.text(self.source);
                !CONTROL_KEYWORDS.contains(&text)
            }
            // `) {` after punctuation: grouping, not a function head
            _ => false,
        }
    }

    /// `require ( 'literal' )` at a code index.
    fn match_require_call(&self, idx: usize) -> Option<(String, usize)> {
        if self.text(idx) != "require" || !self.is_punct(idx + 1, '(') {
            return None;
        }
        let arg = self.tok(idx + 2)?;
        if arg.kind != TokenKind::String || !self.is_punct(idx + 3, ')') {
            return None;
        }
        Some((strip_quotes(arg.text(self.source)).to_string(), idx + 3))
    }

    /// Parse a `const`/`let`/`var` statement starting at `i`.
    /// Returns the code index to resume the main loop from. On a
    /// mismatch nothing is consumed past the point of failure, so
    /// braces inside unrecognized initializers are still balanced by
    /// the main loop.
    fn parse_declaration(&mut self, i: usize) -> usize {
        let decl_start = self.tokens[self.code[i]].start;
        let mut consumed_any = false;
        let mut j = i + 1;

        loop {
            if self.is_identifier(j) {
                match self.parse_simple_declarator(i, decl_start, j) {
                    DeclaratorResult::Bound(next) => {
                        consumed_any = true;
                        if self.is_punct(next, ',') {
                            j = next + 1;
                            continue;
                        }
                        return next;
                    }
                    DeclaratorResult::Skipped(next) => {
                        consumed_any = true;
                        if self.is_punct(next, ',') {
                            j = next + 1;
                            continue;
                        }
                        return next;
                    }
                    DeclaratorResult::Mismatch => {
                        return if consumed_any { j } else { i + 1 };
                    }
                }
            } else if self.is_punct(j, '{') {
                match self.parse_destructured_declarator(decl_start, j) {
                    DeclaratorResult::Bound(next) | DeclaratorResult::Skipped(next) => {
                        consumed_any = true;
                        if self.is_punct(next, ',') {
                            j = next + 1;
                            continue;
                        }
                        return next;
                    }
                    DeclaratorResult::Mismatch => {
                        return if consumed_any { j } else { i + 1 };
                    }
                }
            } else {
                return if consumed_any { j } else { i + 1 };
            }
        }
    }

    fn parse_simple_declarator(
        &mut self,
        _decl_idx: usize,
        decl_start: u32,
        j: usize,
    ) -> DeclaratorResult {
        let name_tok = self.tokens[self.code[j]];

        // Single `=`, not `==` or `=>`
        if !self.is_punct(j + 1, '=') || self.is_punct(j + 2, '=') || self.is_punct(j + 2, '>') {
            return DeclaratorResult::Mismatch;
        }

        if let Some((path, close_idx)) = self.match_require_call(j + 2) {
            let close = self.tokens[self.code[close_idx]];

            // `const x = require('./m').member`: the member chain is
            // tracked like an inline require so a caret on the member
            // still resolves
            if self.is_punct(close_idx + 1, '.') && self.is_identifier(close_idx + 2) {
                let member_tok = self.tokens[self.code[close_idx + 2]];
                self.inline_requires.push(InlineRequire {
                    module_path: path.clone(),
                    call_start: self.tokens[self.code[j + 2]].start,
                    call_end: close.end,
                    member: Some(InlineMember {
                        name: member_tok.text(self.source).to_string(),
                        start: member_tok.start,
                        end: member_tok.end,
                    }),
                });
            }

            self.bindings.push(RequireBinding {
                local_name: name_tok.text(self.source).to_string(),
                module_path: path,
                member_name: None,
                decl_start,
                decl_end: close.end,
                name_start: name_tok.start,
                name_end: name_tok.end,
                prop_start: name_tok.start,
                prop_end: name_tok.end,
                scope: self.current_scope(),
            });
            return DeclaratorResult::Bound(close_idx + 1);
        }

        // Not a require initializer: skip ahead, but hand every `{`
        // and every `require` back to the main loop. A function or
        // arrow initializer body must still open its scope and have
        // its declarations extracted.
        let mut depth = 0usize;
        let mut k = j + 2;
        while let Some(tok) = self.tok(k) {
            if tok.kind == TokenKind::Punctuation {
                let text = tok.text(self.source);
                match text {
                    "{" | "}" => return DeclaratorResult::Skipped(k),
                    "(" | "[" => depth += 1,
                    ")" | "]" => {
                        if depth == 0 {
                            return DeclaratorResult::Skipped(k);
                        }
                        depth -= 1;
                    }
                    "," if depth == 0 => return DeclaratorResult::Skipped(k),
                    ";" if depth == 0 => return DeclaratorResult::Skipped(k),
                    _ => {}
                }
            } else if tok.kind == TokenKind::Identifier {
                let text = tok.text(self.source);
                if text == "require" {
                    return DeclaratorResult::Skipped(k);
                }
                // Next statement starts without a semicolon
                if depth == 0 && DECLARATION_KEYWORDS.contains(&text) {
                    return DeclaratorResult::Skipped(k);
                }
            }
            k += 1;
        }
        DeclaratorResult::Skipped(k)
    }

    fn parse_destructured_declarator(&mut self, decl_start: u32, j: usize) -> DeclaratorResult {
        // Collect `{ prop, prop: alias, 'prop': alias, }` members.
        // Comments never appear here: the code index excludes them.
        struct Member {
            prop: String,
            local: String,
            name_start: u32,
            name_end: u32,
            prop_start: u32,
            prop_end: u32,
        }

        let mut members: Vec<Member> = Vec::new();
        let mut k = j + 1;

        loop {
            if self.is_punct(k, '}') {
                k += 1;
                break;
            }

            let prop_tok = match self.tok(k) {
                Some(t) => *t,
                None => return DeclaratorResult::Mismatch,
            };

            let member = match prop_tok.kind {
                TokenKind::Identifier => {
                    if self.is_punct(k + 1, ':') && self.is_identifier(k + 2) {
                        let local_tok = self.tokens[self.code[k + 2]];
                        k += 3;
                        Member {
                            prop: prop_tok.text(self.source).to_string(),
                            local: local_tok.text(self.source).to_string(),
                            name_start: local_tok.start,
                            name_end: local_tok.end,
                            prop_start: prop_tok.start,
                            prop_end: prop_tok.end,
                        }
                    } else {
                        k += 1;
                        Member {
                            prop: prop_tok.text(self.source).to_string(),
                            local: prop_tok.text(self.source).to_string(),
                            name_start: prop_tok.start,
                            name_end: prop_tok.end,
                            prop_start: prop_tok.start,
                            prop_end: prop_tok.end,
                        }
                    }
                }
                TokenKind::String => {
                    // Quoted property must have an alias
                    if self.is_punct(k + 1, ':') && self.is_identifier(k + 2) {
                        let local_tok = self.tokens[self.code[k + 2]];
                        k += 3;
                        Member {
                            prop: strip_quotes(prop_tok.text(self.source)).to_string(),
                            local: local_tok.text(self.source).to_string(),
                            name_start: local_tok.start,
                            name_end: local_tok.end,
                            prop_start: prop_tok.start,
                            prop_end: prop_tok.end,
                        }
                    } else {
                        return DeclaratorResult::Mismatch;
                    }
                }
                _ => return DeclaratorResult::Mismatch,
            };
            members.push(member);

            if self.is_punct(k, ',') {
                k += 1;
                continue;
            }
            if self.is_punct(k, '}') {
                k += 1;
                break;
            }
            return DeclaratorResult::Mismatch;
        }

        if !self.is_punct(k, '=') || self.is_punct(k + 1, '=') {
            return DeclaratorResult::Mismatch;
        }

        let Some((path, close_idx)) = self.match_require_call(k + 1) else {
            return DeclaratorResult::Mismatch;
        };
        let close = self.tokens[self.code[close_idx]];

        for member in members {
            self.bindings.push(RequireBinding {
                local_name: member.local,
                module_path: path.clone(),
                member_name: Some(member.prop),
                decl_start,
                decl_end: close.end,
                name_start: member.name_start,
                name_end: member.name_end,
                prop_start: member.prop_start,
                prop_end: member.prop_end,
                scope: self.current_scope(),
            });
        }
        DeclaratorResult::Bound(close_idx + 1)
    }

    /// A bare `require(...)` reached by the main loop, i.e. one not
    /// consumed by a declaration.
    fn parse_inline_require(&mut self, i: usize) -> usize {
        let Some((path, close_idx)) = self.match_require_call(i) else {
            return i + 1;
        };
        let call_start = self.tokens[self.code[i]].start;
        let close = self.tokens[self.code[close_idx]];

        let mut next = close_idx + 1;
        let member = if self.is_punct(close_idx + 1, '.') && self.is_identifier(close_idx + 2) {
            let member_tok = self.tokens[self.code[close_idx + 2]];
            next = close_idx + 3;
            Some(InlineMember {
                name: member_tok.text(self.source).to_string(),
                start: member_tok.start,
                end: member_tok.end,
            })
        } else {
            None
        };

        self.inline_requires.push(InlineRequire {
            module_path: path,
            call_start,
            call_end: close.end,
            member,
        });
        next
    }
}

enum DeclaratorResult {
    /// Declarator bound one or more names; resume after it.
    Bound(usize),
    /// Declarator recognized but not a require; resume at the
    /// separator.
    Skipped(usize),
    /// Shape not recognized; the caller rewinds.
    Mismatch,
}

fn strip_quotes(text: &str) -> &str {
    let text = text
        .strip_prefix(['\'', '"'])
        .unwrap_or(text);
    text.strip_suffix(['\'', '"']).unwrap_or(text)
}

#[cfg(test)]
mod scan_tests {
    use super::*;

    fn binding<'a>(scan: &'a FileScan, name: &str) -> &'a RequireBinding {
        scan.bindings()
            .iter()
            .find(|b| b.local_name == name)
            .unwrap_or_else(|| panic!("no binding named {name}"))
    }

    #[test]
    fn test_simple_binding() {
        let scan = FileScan::new("var moduleA = require('./moduleA')\n");
        assert_eq!(scan.bindings().len(), 1);

        let b = binding(&scan, "moduleA");
        assert_eq!(b.module_path, "./moduleA");
        assert_eq!(b.member_name, None);
        assert_eq!(b.scope, ScopeId::TOP);
        assert_eq!((b.decl_start, b.decl_end), (0, 34));
        assert_eq!((b.name_start, b.name_end), (4, 11));
    }

    #[test]
    fn test_double_quoted_path() {
        let scan = FileScan::new("const fs = require(\"./fs-helpers\")\n");
        assert_eq!(binding(&scan, "fs").module_path, "./fs-helpers");
    }

    #[test]
    fn test_multi_declarator_statement() {
        let scan = FileScan::new("var a = require('./a'), b = require('./b')\n");
        assert_eq!(scan.bindings().len(), 2);
        assert_eq!(binding(&scan, "a").module_path, "./a");
        assert_eq!(binding(&scan, "b").module_path, "./b");
    }

    #[test]
    fn test_mixed_declarators() {
        let scan = FileScan::new("var count = 0, util = require('./util')\n");
        assert_eq!(scan.bindings().len(), 1);
        assert_eq!(binding(&scan, "util").module_path, "./util");
    }

    #[test]
    fn test_destructured_members() {
        let scan = FileScan::new("const { foo, bar } = require('./moduleB')\n");
        assert_eq!(scan.bindings().len(), 2);

        let foo = binding(&scan, "foo");
        assert_eq!(foo.member_name.as_deref(), Some("foo"));
        assert_eq!(foo.module_path, "./moduleB");
        let bar = binding(&scan, "bar");
        assert_eq!(bar.member_name.as_deref(), Some("bar"));
    }

    #[test]
    fn test_destructured_alias() {
        let scan = FileScan::new("const { foo: localFoo } = require('./m')\n");
        let b = binding(&scan, "localFoo");
        assert_eq!(b.member_name.as_deref(), Some("foo"));
        assert!(scan.bindings().iter().all(|b| b.local_name != "foo"));
    }

    #[test]
    fn test_destructured_quoted_property() {
        let scan = FileScan::new("const { 'data-set': data } = require('./m')\n");
        let b = binding(&scan, "data");
        assert_eq!(b.member_name.as_deref(), Some("data-set"));
    }

    #[test]
    fn test_multiline_destructuring_with_comments() {
        let source = "const {\n\tfoo, // first\n\tbar,\n} = require('./moduleB')\n";
        let scan = FileScan::new(source);
        assert_eq!(scan.bindings().len(), 2);
        assert_eq!(binding(&scan, "foo").member_name.as_deref(), Some("foo"));
        assert_eq!(binding(&scan, "bar").member_name.as_deref(), Some("bar"));
        // Whole-declaration span reaches the closing paren
        assert_eq!(binding(&scan, "foo").decl_end, source.trim_end().len() as u32);
    }

    #[test]
    fn test_requires_in_comments_are_ignored() {
        let source = "// var fake = require('./fake')\n/* const { x } = require('./x') */\nvar real = require('./real')\n";
        let scan = FileScan::new(source);
        assert_eq!(scan.bindings().len(), 1);
        assert_eq!(scan.bindings()[0].local_name, "real");
    }

    #[test]
    fn test_requires_in_strings_are_ignored() {
        let scan = FileScan::new("var s = \"require('./nope')\"\n");
        assert_eq!(scan.bindings().len(), 0);
        assert_eq!(scan.inline_requires().len(), 0);
    }

    #[test]
    fn test_inline_require_with_member() {
        let source = "require('./moduleA').foo()\n";
        let scan = FileScan::new(source);
        assert_eq!(scan.bindings().len(), 0);
        assert_eq!(scan.inline_requires().len(), 1);

        let inline = &scan.inline_requires()[0];
        assert_eq!(inline.module_path, "./moduleA");
        assert_eq!((inline.call_start, inline.call_end), (0, 20));
        let member = inline.member.as_ref().unwrap();
        assert_eq!(member.name, "foo");
        assert_eq!((member.start, member.end), (21, 24));
    }

    #[test]
    fn test_dynamic_require_not_recognized() {
        let scan = FileScan::new("var m = require(path)\nrequire(name + '.js')\n");
        assert_eq!(scan.bindings().len(), 0);
        assert_eq!(scan.inline_requires().len(), 0);
    }

    #[test]
    fn test_function_scope_nesting() {
        let source = "\
var outer = require('./outer')
function run() {
\tvar inner = require('./inner')
}
";
        let scan = FileScan::new(source);
        assert_eq!(scan.scopes().len(), 2);

        let outer = binding(&scan, "outer");
        let inner = binding(&scan, "inner");
        assert_eq!(outer.scope, ScopeId::TOP);
        assert_eq!(inner.scope, ScopeId(1));
        assert_eq!(scan.scopes()[1].parent, Some(ScopeId::TOP));
    }

    #[test]
    fn test_if_block_is_not_a_scope() {
        let source = "\
if (condition) {
\tvar mod = require('./mod')
}
mod.use()
";
        let scan = FileScan::new(source);
        assert_eq!(scan.scopes().len(), 1);
        assert_eq!(binding(&scan, "mod").scope, ScopeId::TOP);
    }

    #[test]
    fn test_arrow_body_is_a_scope() {
        let source = "const handler = () => {\n\tconst m = require('./m')\n}\n";
        let scan = FileScan::new(source);
        assert_eq!(scan.scopes().len(), 2);
        assert_eq!(binding(&scan, "m").scope, ScopeId(1));
    }

    #[test]
    fn test_function_expression_initializer_opens_scope() {
        let source = "var helper = function () {\n\tvar dep = require('./dep')\n}\n";
        let scan = FileScan::new(source);
        assert_eq!(scan.scopes().len(), 2);
        assert_eq!(scan.bindings().len(), 1);
        assert_eq!(binding(&scan, "dep").scope, ScopeId(1));
    }

    #[test]
    fn test_require_nested_in_call_initializer() {
        let source = "const u = wrap(require('./w'))\n";
        let scan = FileScan::new(source);
        assert_eq!(scan.bindings().len(), 0);
        assert_eq!(scan.inline_requires().len(), 1);
        assert_eq!(scan.inline_requires()[0].module_path, "./w");
    }

    #[test]
    fn test_iife_scopes_are_siblings() {
        let source = "\
(function () {
\tvar dep = require('./first')
})()
(function () {
\tvar dep = require('./second')
})()
";
        let scan = FileScan::new(source);
        assert_eq!(scan.scopes().len(), 3);
        assert_eq!(scan.bindings().len(), 2);
        assert_eq!(scan.bindings()[0].scope, ScopeId(1));
        assert_eq!(scan.bindings()[1].scope, ScopeId(2));
        assert_eq!(scan.scopes()[2].parent, Some(ScopeId::TOP));
    }

    #[test]
    fn test_shadowing_lookup() {
        let source = "\
var dep = require('./outer')
function inner() {
\tvar dep = require('./inner')
\tdep.use()
}
dep.use()
";
        let scan = FileScan::new(source);
        // Position inside the function body
        let inside = source.find("dep.use").unwrap() as u32;
        // The last line, outside
        let outside = source.rfind("dep.use").unwrap() as u32;

        assert_eq!(
            scan.lookup_binding("dep", inside).unwrap().module_path,
            "./inner"
        );
        assert_eq!(
            scan.lookup_binding("dep", outside).unwrap().module_path,
            "./outer"
        );
    }

    #[test]
    fn test_binding_decl_at_name_vs_whole() {
        let source = "const { foo } = require('./b')\n";
        let scan = FileScan::new(source);

        let on_name = source.find("foo").unwrap() as u32;
        let (b, hit) = scan.binding_decl_at(on_name).unwrap();
        assert_eq!(hit, DeclHit::Name);
        assert_eq!(b.member_name.as_deref(), Some("foo"));

        let on_path = source.find("./b").unwrap() as u32;
        let (_, hit) = scan.binding_decl_at(on_path).unwrap();
        assert_eq!(hit, DeclHit::Whole);

        assert!(scan.binding_decl_at(source.len() as u32).is_none());
    }

    #[test]
    fn test_unbalanced_braces_do_not_panic() {
        let scan = FileScan::new("}}} function f() { var x = require('./x')\n");
        assert_eq!(scan.bindings().len(), 1);
    }
}
