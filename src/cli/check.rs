use std::{path::PathBuf, process};

use clap::Parser;
use tracing::instrument;
use wikify::{Directory, Rewriter};

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check for links that still need rewriting")]
pub struct Check {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Output only file paths (no headers, no colors)
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root)?;
        let config = directory.config();
        let rewriter = Rewriter::with_extension(config.style, config.extension());

        let report = directory.scan(&rewriter)?;

        if report.is_clean() {
            if !self.quiet {
                println!("{}", "✅ No links need rewriting.".success());
            }
            return Ok(());
        }

        if self.quiet {
            for file in &report.files {
                println!("{}", file.path.display());
            }
            process::exit(2);
        }

        match self.output {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "markdown_files": report.markdown_files,
                    "pending_files": report.files.len(),
                    "pending_links": report.total_replacements(),
                    "files": report.files,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!(
                    "{}",
                    format!(
                        "⚠️  {} of {} markdown files contain links that need rewriting",
                        report.files.len(),
                        report.markdown_files
                    )
                    .warning()
                );
                println!();
                for file in &report.files {
                    println!(
                        "  • {} ({} links on {} lines)",
                        file.path.display(),
                        file.replacements,
                        file.lines_changed
                    );
                }
                println!();
                println!("{}", "Run 'mdwiki rewrite' to apply the changes".dim());
            }
        }

        // Exit with code 2 to indicate pending rewrites (for CI)
        process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn check_succeeds_on_clean_tree() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("page.md"), "already flat: (Guide)\n").unwrap();

        let check = Check {
            output: OutputFormat::Table,
            quiet: false,
        };
        check
            .run(tmp.path().to_path_buf())
            .expect("check should succeed with nothing to rewrite");
    }

    #[test]
    fn check_succeeds_on_empty_tree() {
        let tmp = tempdir().unwrap();

        let check = Check {
            output: OutputFormat::Json,
            quiet: false,
        };
        check
            .run(tmp.path().to_path_buf())
            .expect("check should succeed on an empty tree");
    }

    #[test]
    fn check_fails_on_missing_root() {
        let tmp = tempdir().unwrap();

        let check = Check {
            output: OutputFormat::Table,
            quiet: true,
        };
        assert!(check.run(tmp.path().join("no-such-dir")).is_err());
    }
}
