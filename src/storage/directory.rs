//! A filesystem-backed documentation tree
//!
//! The [`Directory`] pairs a root path with its configuration and applies
//! the filesystem-agnostic [`Rewriter`] to every markdown file found under
//! the root. Traversal is depth-first and strictly sequential; each file is
//! read, transformed, and written back before the next one is visited.

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;
use walkdir::WalkDir;

use crate::domain::{Config, Rewriter};

/// Directory name holding tool metadata, excluded from traversal.
pub const META_DIR: &str = ".wikify";

/// Errors raised while opening, walking, or rewriting the tree.
///
/// Every variant is fatal for the whole run: this is a one-shot batch tool
/// with no partial-success or retry policy.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// The root path does not exist or is not a directory.
    #[error("root directory '{}' does not exist or is not a directory", .0.display())]
    MissingRoot(PathBuf),

    /// The traversal failed, e.g. an unreadable subdirectory.
    #[error("failed to traverse directory tree")]
    Walk(#[from] walkdir::Error),

    /// A markdown file could not be read.
    #[error("failed to read '{}'", path.display())]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A transformed file could not be written back.
    #[error("failed to write '{}'", path.display())]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Per-file outcome of a scan or rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    /// The file path, relative to the root.
    pub path: PathBuf,

    /// The number of lines that were (or would be) changed.
    pub lines_changed: usize,

    /// The number of link substitutions in this file.
    pub replacements: usize,
}

/// Aggregate outcome of a pass over the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    /// The number of markdown files visited.
    pub markdown_files: usize,

    /// Files containing rewritable links, in traversal order.
    pub files: Vec<FileOutcome>,
}

impl RewriteReport {
    /// The total number of link substitutions across all files.
    #[must_use]
    pub fn total_replacements(&self) -> usize {
        self.files.iter().map(|f| f.replacements).sum()
    }

    /// Returns `true` when no file contains a rewritable link.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }
}

/// A documentation tree rooted at a path.
#[derive(Debug)]
pub struct Directory {
    /// The root of the documentation tree.
    root: PathBuf,
    config: Config,
}

impl Directory {
    /// Opens the documentation tree at `root`, loading its configuration.
    ///
    /// A missing or unreadable configuration file falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::MissingRoot`] if `root` does not exist or is
    /// not a directory.
    pub fn new(root: PathBuf) -> Result<Self, RewriteError> {
        if !root.is_dir() {
            return Err(RewriteError::MissingRoot(root));
        }
        let config = load_config(&root);
        Ok(Self { root, config })
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The root of the documentation tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans the tree without modifying any file.
    ///
    /// # Errors
    ///
    /// The first traversal or read failure aborts the scan.
    pub fn scan(&self, rewriter: &Rewriter) -> Result<RewriteReport, RewriteError> {
        self.process(rewriter, false)
    }

    /// Rewrites every markdown file under the root in place.
    ///
    /// Files whose content is unchanged by the rewrite are not rewritten,
    /// so a second run over the same tree is a no-op. No backups are kept.
    ///
    /// # Errors
    ///
    /// The first traversal, read, or write failure aborts the run. Files
    /// already rewritten before the failure stay rewritten.
    pub fn rewrite_all(&self, rewriter: &Rewriter) -> Result<RewriteReport, RewriteError> {
        self.process(rewriter, true)
    }

    fn process(&self, rewriter: &Rewriter, apply: bool) -> Result<RewriteReport, RewriteError> {
        let mut report = RewriteReport::default();

        for path in self.markdown_paths()? {
            report.markdown_files += 1;

            let content = fs::read_to_string(&path).map_err(|source| RewriteError::Read {
                path: path.clone(),
                source,
            })?;

            let outcome = rewriter.rewrite(&content);
            if outcome.replacements == 0 {
                continue;
            }

            if apply {
                tracing::debug!("rewriting {}", path.display());
                fs::write(&path, &outcome.content).map_err(|source| RewriteError::Write {
                    path: path.clone(),
                    source,
                })?;
            }

            let relative = path.strip_prefix(&self.root).unwrap_or(&path).to_path_buf();
            report.files.push(FileOutcome {
                path: relative,
                lines_changed: outcome.lines_changed,
                replacements: outcome.replacements,
            });
        }

        Ok(report)
    }

    /// Collects every markdown file under the root, depth-first.
    ///
    /// The `.wikify` metadata directory is skipped. Symbolic links are only
    /// followed when the configuration opts in.
    fn markdown_paths(&self) -> Result<Vec<PathBuf>, RewriteError> {
        let extension = self.config.extension().to_string();
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(self.config.follow_symlinks) {
            let entry = entry?;
            if entry
                .path()
                .components()
                .any(|c| c.as_os_str() == META_DIR)
            {
                continue;
            }
            if entry.file_type().is_file()
                && entry.path().extension() == Some(OsStr::new(&extension))
            {
                paths.push(entry.into_path());
            }
        }

        Ok(paths)
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(META_DIR).join("config.toml");
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}
