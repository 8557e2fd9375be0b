//! Go-to-definition over require references.
//!
//! The provider runs a three-step state machine per query: identify
//! the token (or declaration/inline-require span) under the caret,
//! classify it as a bound local name, a `.member` suffix, or neither,
//! and resolve through the module-path resolver and, for members, the
//! export locator on the target file's own scan.
//!
//! There is no fatal error path: malformed source, unresolved paths,
//! and unreadable targets all degrade to an empty result.

use std::path::Path;

use cjsnav_common::{Location, Position, Range};
use cjsnav_scanner::TokenKind;
use tracing::debug;

use crate::exports::ExportScan;
use crate::host::FileHost;
use crate::module_resolver::resolve_module_path;
use crate::scan::{DeclHit, FileScan};

/// Go-to-definition provider.
///
/// Stateless across queries: each call derives everything it needs
/// from the inputs plus at most one host read of the resolved target.
pub struct DefinitionProvider<'h> {
    host: &'h dyn FileHost,
}

impl<'h> DefinitionProvider<'h> {
    pub fn new(host: &'h dyn FileHost) -> Self {
        DefinitionProvider { host }
    }

    /// Resolve the reference at `position`. Returns an empty vector
    /// when nothing resolves; the first entry is authoritative for
    /// callers that need a single result.
    pub fn provide_definition(
        &self,
        file_path: &Path,
        source_text: &str,
        position: Position,
    ) -> Vec<Location> {
        let scan = FileScan::new(source_text);
        self.provide_with_scan(file_path, source_text, &scan, position)
    }

    /// Like [`Self::provide_definition`], but reusing a scan the
    /// caller built once for this file version.
    pub fn provide_with_scan(
        &self,
        file_path: &Path,
        source_text: &str,
        scan: &FileScan,
        position: Position,
    ) -> Vec<Location> {
        let Some(offset) = scan.line_map().position_to_offset(position, source_text) else {
            return Vec::new();
        };

        if let Some(idx) = scan.identifier_at(offset) {
            let Some(token) = scan.code_token(idx) else {
                return Vec::new();
            };
            let name = token.text(source_text);

            // `.member` suffix: classify by the base expression only,
            // never by the member name itself
            if idx >= 1 && scan.code_token(idx - 1).is_some_and(|t| t.is_punct(source_text, '.')) {
                return self.resolve_member_access(file_path, source_text, scan, idx, offset);
            }

            if let Some(binding) = scan.lookup_binding(name, offset) {
                debug!(name, module = %binding.module_path, "resolved through binding table");
                return self.resolve(file_path, &binding.module_path, binding.member_name.as_deref());
            }
        }

        // Anywhere on a require declaration counts as a reference to
        // it, down to the path string and the `=`
        if let Some((binding, hit)) = scan.binding_decl_at(offset) {
            let member = match hit {
                DeclHit::Name => binding.member_name.as_deref(),
                DeclHit::Whole => None,
            };
            return self.resolve(file_path, &binding.module_path, member);
        }

        if let Some((inline, on_member)) = scan.inline_require_at(offset) {
            let member = if on_member {
                inline.member.as_ref().map(|m| m.name.as_str())
            } else {
                None
            };
            return self.resolve(file_path, &inline.module_path, member);
        }

        Vec::new()
    }

    /// Cursor on the identifier after a `.`: resolve through the base
    /// expression (a bound name or an inline require call).
    fn resolve_member_access(
        &self,
        file_path: &Path,
        source_text: &str,
        scan: &FileScan,
        member_idx: usize,
        offset: u32,
    ) -> Vec<Location> {
        let Some(member_token) = scan.code_token(member_idx) else {
            return Vec::new();
        };
        let member_name = member_token.text(source_text);

        if member_idx >= 2 {
            if let Some(base) = scan.code_token(member_idx - 2) {
                if base.kind == TokenKind::Identifier {
                    let base_name = base.text(source_text);
                    if let Some(binding) = scan.lookup_binding(base_name, offset) {
                        // A destructured base is already one hop deep;
                        // deeper chains are out of scope, so resolve
                        // the base member itself
                        let member = match binding.member_name.as_deref() {
                            Some(base_member) => Some(base_member),
                            None => Some(member_name),
                        };
                        return self.resolve(file_path, &binding.module_path, member);
                    }
                    debug!(base_name, "member access on unbound base");
                    return Vec::new();
                }
            }
        }

        // `require('./m').member` chains carry no binding; the inline
        // record covers the member span
        if let Some((inline, true)) = scan.inline_require_at(offset) {
            let member = inline.member.as_ref().map(|m| m.name.as_str());
            return self.resolve(file_path, &inline.module_path, member);
        }

        Vec::new()
    }

    fn resolve(
        &self,
        containing_file: &Path,
        module_path: &str,
        member: Option<&str>,
    ) -> Vec<Location> {
        let Some(target) = resolve_module_path(module_path, containing_file, self.host) else {
            debug!(module_path, "module path did not resolve");
            return Vec::new();
        };

        let range = match member {
            Some(member_name) => match self.host.read_file(&target) {
                Ok(target_text) => ExportScan::new(&target_text)
                    .find(member_name)
                    .unwrap_or_else(Range::start_of_file),
                Err(err) => {
                    debug!(target = %target.display(), %err, "target read failed");
                    return Vec::new();
                }
            },
            None => Range::start_of_file(),
        };

        vec![Location::new(target.to_string_lossy().into_owned(), range)]
    }
}
