//! Wiki-style markdown link flattening
//!
//! Documentation trees are walked recursively and relative links to local
//! markdown files are rewritten in place to the flat, extension-less page
//! names expected by a wiki-style publishing target.

pub mod domain;
pub use domain::{Config, LinkStyle, Rewriter, Rewritten};

/// Filesystem traversal and in-place rewriting.
pub mod storage;
pub use storage::{Directory, FileOutcome, RewriteError, RewriteReport};
