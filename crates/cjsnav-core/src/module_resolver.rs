//! Module path resolution.
//!
//! Maps a `require()` literal plus the requiring file's location to a
//! concrete file. This mirrors conventional CommonJS resolution for
//! relative and absolute specifiers — as given, then with `.js`/`.jsx`
//! appended, then as a directory index — and deliberately omits
//! package-manifest lookups: bare specifiers belong to a full module
//! loader, not this engine.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use crate::host::FileHost;

/// Extensions the resolver recognizes and probes, in order.
pub const EXTENSION_CANDIDATES: &[&str] = &["js", "jsx"];

/// Resolve a require literal to a concrete file, or `None`.
pub fn resolve_module_path(
    specifier: &str,
    containing_file: &Path,
    host: &dyn FileHost,
) -> Option<PathBuf> {
    if !is_relative(specifier) && !Path::new(specifier).is_absolute() {
        // Bare specifier (npm package): out of scope
        trace!(specifier, "bare specifier, not resolving");
        return None;
    }

    let base = containing_file.parent().unwrap_or_else(|| Path::new(""));
    let candidate = normalize(&base.join(specifier));

    if has_recognized_extension(&candidate) {
        return if host.is_file(&candidate) {
            Some(candidate)
        } else {
            trace!(candidate = %candidate.display(), "explicit extension, file missing");
            None
        };
    }

    try_file_or_directory(&candidate, host)
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

fn has_recognized_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSION_CANDIDATES.contains(&ext))
}

/// Try the path as given, then with each extension appended.
fn try_file(path: &Path, host: &dyn FileHost) -> Option<PathBuf> {
    if host.is_file(path) {
        return Some(path.to_path_buf());
    }
    for ext in EXTENSION_CANDIDATES {
        let with_ext = append_extension(path, ext);
        trace!(candidate = %with_ext.display(), "probing");
        if host.is_file(&with_ext) {
            return Some(with_ext);
        }
    }
    None
}

/// Try as a file, then as a directory with an index file.
fn try_file_or_directory(path: &Path, host: &dyn FileHost) -> Option<PathBuf> {
    if let Some(resolved) = try_file(path, host) {
        return Some(resolved);
    }

    if host.is_dir(path) {
        for ext in EXTENSION_CANDIDATES {
            let index = path.join(format!("index.{ext}"));
            trace!(candidate = %index.display(), "probing directory index");
            if host.is_file(&index) {
                return Some(index);
            }
        }
    }

    None
}

/// Append an extension rather than replace one, so `require('./a.b')`
/// probes `a.b.js`, matching Node's behavior.
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

/// Lexically resolve `.` and `..` segments. The host may be an
/// in-memory map, so filesystem canonicalization is not an option.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod resolver_tests {
    use super::*;
    use crate::host::MemoryFileHost;

    fn host_with(paths: &[&str]) -> MemoryFileHost {
        let mut host = MemoryFileHost::new();
        for path in paths {
            host.set_file(*path, "");
        }
        host
    }

    #[test]
    fn test_resolve_with_js_extension_appended() {
        let host = host_with(&["/proj/moduleA.js"]);
        let resolved =
            resolve_module_path("./moduleA", Path::new("/proj/main.js"), &host).unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/moduleA.js"));
    }

    #[test]
    fn test_jsx_fallback_after_js() {
        let host = host_with(&["/proj/View.jsx"]);
        let resolved = resolve_module_path("./View", Path::new("/proj/app.jsx"), &host).unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/View.jsx"));
    }

    #[test]
    fn test_js_preferred_over_jsx() {
        let host = host_with(&["/proj/View.js", "/proj/View.jsx"]);
        let resolved = resolve_module_path("./View", Path::new("/proj/app.js"), &host).unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/View.js"));
    }

    #[test]
    fn test_explicit_extension_checked_as_given() {
        let host = host_with(&["/proj/moduleA.js"]);
        let resolved =
            resolve_module_path("./moduleA.js", Path::new("/proj/main.js"), &host).unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/moduleA.js"));

        assert!(resolve_module_path("./missing.js", Path::new("/proj/main.js"), &host).is_none());
    }

    #[test]
    fn test_directory_index_fallback() {
        let host = host_with(&["/proj/lib/index.js"]);
        let resolved = resolve_module_path("./lib", Path::new("/proj/main.js"), &host).unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/lib/index.js"));

        let host = host_with(&["/proj/lib/index.jsx"]);
        let resolved = resolve_module_path("./lib", Path::new("/proj/main.js"), &host).unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/lib/index.jsx"));
    }

    #[test]
    fn test_parent_relative_path() {
        let host = host_with(&["/proj/shared/util.js"]);
        let resolved =
            resolve_module_path("../shared/util", Path::new("/proj/app/main.js"), &host).unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/shared/util.js"));
    }

    #[test]
    fn test_bare_specifier_is_out_of_scope() {
        let host = host_with(&["/proj/node_modules/lodash/index.js"]);
        assert!(resolve_module_path("lodash", Path::new("/proj/main.js"), &host).is_none());
    }

    #[test]
    fn test_unresolvable_path() {
        let host = host_with(&["/proj/main.js"]);
        assert!(resolve_module_path("./nothing", Path::new("/proj/main.js"), &host).is_none());
    }

    #[test]
    fn test_dotted_name_appends_extension() {
        let host = host_with(&["/proj/config.prod.js"]);
        let resolved =
            resolve_module_path("./config.prod", Path::new("/proj/main.js"), &host).unwrap();
        assert_eq!(resolved, PathBuf::from("/proj/config.prod.js"));
    }

    #[test]
    fn test_against_real_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("moduleA.js"), "exports.baz = 1\n").unwrap();
        std::fs::create_dir(root.join("lib")).unwrap();
        std::fs::write(root.join("lib").join("index.jsx"), "module.exports = {}\n").unwrap();

        let host = crate::host::OsFileHost;
        let main = root.join("main.js");

        let resolved = resolve_module_path("./moduleA", &main, &host).unwrap();
        assert_eq!(resolved, root.join("moduleA.js"));

        let resolved = resolve_module_path("./lib", &main, &host).unwrap();
        assert_eq!(resolved, root.join("lib").join("index.jsx"));

        assert!(resolve_module_path("./absent", &main, &host).is_none());
    }
}
