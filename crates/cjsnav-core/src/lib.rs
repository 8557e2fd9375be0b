//! Reference-resolution engine for CommonJS `require()` graphs.
//!
//! Given a source file and a cursor position, the engine determines
//! whether the position references a locally-bound module import, a
//! member of that module's exported object, or an unrelated token —
//! and for the first two returns the target file plus a precise range
//! inside it.
//!
//! The engine is synchronous and stateless across queries: each query
//! is a pure function of `(source text, position)` plus at most one
//! read of the resolved target file through [`host::FileHost`].

pub mod definition;
pub mod exports;
pub mod host;
pub mod module_resolver;
pub mod scan;

pub use definition::DefinitionProvider;
pub use exports::{ExportDefinition, ExportScan};
pub use host::{FileHost, MemoryFileHost, OsFileHost};
pub use module_resolver::resolve_module_path;
pub use scan::{FileScan, RequireBinding, ScopeId};
