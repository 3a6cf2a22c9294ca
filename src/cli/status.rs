use std::{collections::BTreeMap, path::PathBuf, process};

use clap::Parser;
use tracing::instrument;
use wikify::{Directory, RewriteReport, Rewriter};

use super::terminal::{is_narrow, Colorize};

#[derive(Debug, Parser, Default)]
#[command(about = "Show pending link rewrites for the documentation tree")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root)?;
        let config = directory.config();
        let rewriter = Rewriter::with_extension(config.style, config.extension());

        let report = directory.scan(&rewriter)?;

        if report.markdown_files == 0 {
            println!("No markdown files found. Nothing to publish from this root.");
            return Ok(());
        }

        // Pending link counts grouped by top-level folder. Files directly
        // under the root are grouped as ".".
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for file in &report.files {
            let mut components = file.path.components();
            let first = components.next();
            let folder = match (first, components.next()) {
                (Some(c), Some(_)) => c.as_os_str().to_string_lossy().into_owned(),
                _ => ".".to_string(),
            };
            *counts.entry(folder).or_insert(0) += file.replacements;
        }

        match self.output {
            OutputFormat::Json => Self::output_json(&report, &counts)?,
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&report);
                } else {
                    Self::output_table(&report, &counts);
                }
            }
        }

        // Exit with a non-zero code when the tree still needs rewriting.
        if !report.is_clean() {
            process::exit(2);
        }

        Ok(())
    }

    fn output_json(report: &RewriteReport, counts: &BTreeMap<String, usize>) -> anyhow::Result<()> {
        let output = serde_json::json!({
            "markdown_files": report.markdown_files,
            "pending_files": report.files.len(),
            "pending_links": report.total_replacements(),
            "by_folder": counts,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(report: &RewriteReport) {
        println!(
            "{} {} {}",
            report.markdown_files,
            report.files.len(),
            report.total_replacements()
        );
    }

    fn output_table(report: &RewriteReport, counts: &BTreeMap<String, usize>) {
        println!("Markdown files:   {}", report.markdown_files);
        println!("Files to rewrite: {}", report.files.len());
        println!("Pending links:    {}", report.total_replacements());

        if !counts.is_empty() {
            println!();
            println!("Pending links by folder:");
            let width = if is_narrow() { 12 } else { 28 };
            for (folder, count) in counts {
                println!("  {folder:<width$} {count}");
            }
        }

        println!();
        if report.is_clean() {
            println!("{}", "✅ Ready to publish.".success());
        } else {
            println!(
                "{}",
                "Run 'mdwiki rewrite' before pushing to the wiki".warning()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn status_succeeds_on_empty_tree() {
        let tmp = tempdir().unwrap();

        Status::default()
            .run(tmp.path().to_path_buf())
            .expect("status should succeed on an empty tree");
    }

    #[test]
    fn status_succeeds_on_clean_tree() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("guides")).unwrap();
        fs::write(tmp.path().join("guides/index.md"), "flat (Guide) link\n").unwrap();

        Status::default()
            .run(tmp.path().to_path_buf())
            .expect("status should succeed with no pending rewrites");
    }

    #[test]
    fn status_fails_on_missing_root() {
        let tmp = tempdir().unwrap();

        assert!(Status::default().run(tmp.path().join("no-such-dir")).is_err());
    }
}
