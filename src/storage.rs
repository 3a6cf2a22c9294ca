//! Filesystem traversal and in-place rewriting.

pub mod directory;

pub use directory::{Directory, FileOutcome, RewriteError, RewriteReport, META_DIR};
