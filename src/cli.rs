use std::path::{Path, PathBuf};

mod check;
mod status;
mod terminal;

use check::Check;
use clap::ArgAction;
use status::Status;
use tracing::instrument;
use wikify::{Directory, LinkStyle, Rewriter};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the documentation tree
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Rewrite(Rewrite::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Rewrite relative markdown links in place (default)
    Rewrite(Rewrite),

    /// Check for links that still need rewriting
    ///
    /// Exits with code 2 when any file contains a rewritable link, making
    /// this suitable as a CI gate.
    Check(Check),

    /// Show rewrite status for the documentation tree
    Status(Status),

    /// Initialize rewriter configuration for a documentation tree
    Init,

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Rewrite(command) => command.run(root)?,
            Self::Check(command) => command.run(root)?,
            Self::Status(command) => command.run(root)?,
            Self::Init => Init::run(&root)?,
            Self::Config(command) => command.run(&root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &PathBuf) -> anyhow::Result<()> {
        use std::fs;

        // Create .wikify directory
        let meta_dir = root.join(wikify::storage::META_DIR);
        if meta_dir.exists() {
            anyhow::bail!("Already initialized (found existing .wikify directory)");
        }

        fs::create_dir_all(&meta_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create .wikify directory: {e}"))?;

        // Create config.toml with defaults
        let config_path = meta_dir.join("config.toml");
        let config = wikify::Config::default();
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!("Initialized wiki rewriter in {}", root.display());
        println!("  Created: .wikify/config.toml");
        println!();
        println!("Next steps:");
        println!("  mdwiki check");
        println!("  mdwiki rewrite");

        Ok(())
    }
}

#[derive(Debug, Default, clap::Parser)]
pub struct Rewrite {
    /// Show what would be rewritten without modifying files
    #[arg(long)]
    dry_run: bool,

    /// Suppress per-file output
    #[arg(long, short)]
    quiet: bool,

    /// Override the configured rewrite style
    #[arg(long, value_enum)]
    style: Option<LinkStyle>,
}

impl Rewrite {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let directory = Directory::new(root)?;
        let style = self.style.unwrap_or(directory.config().style);
        let rewriter = Rewriter::with_extension(style, directory.config().extension());

        let report = if self.dry_run {
            directory.scan(&rewriter)?
        } else {
            directory.rewrite_all(&rewriter)?
        };

        if !self.quiet {
            for file in &report.files {
                if self.dry_run {
                    println!(
                        "Would rewrite {} ({} links)",
                        file.path.display(),
                        file.replacements
                    );
                } else {
                    println!("Rewriting {}", file.path.display());
                }
            }
        }

        if self.dry_run {
            if !self.quiet {
                println!(
                    "{}",
                    format!(
                        "Would rewrite {} links across {} files",
                        report.total_replacements(),
                        report.files.len()
                    )
                    .dim()
                );
            }
            return Ok(());
        }

        if !self.quiet {
            println!(
                "{}",
                format!(
                    "✅ Done: rewrote {} links across {} files ({} markdown files scanned)",
                    report.total_replacements(),
                    report.files.len(),
                    report.markdown_files
                )
                .success()
            );
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Config {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let config_path = root.join(".wikify/config.toml");

        match self.command {
            ConfigCommand::Show => {
                let config = if config_path.exists() {
                    wikify::Config::load(&config_path).map_err(|e| anyhow::anyhow!("{e}"))?
                } else {
                    wikify::Config::default()
                };

                println!("Configuration:");
                println!(
                    "  style: {} ({})",
                    config.style,
                    match config.style {
                        LinkStyle::Legacy => "faithful to the original script".dim(),
                        LinkStyle::Balanced => "corrected parentheses".dim(),
                    }
                );
                println!("  extension: {}", config.extension());
                println!("  follow_symlinks: {}", config.follow_symlinks);
            }
            ConfigCommand::Set { key, value } => {
                let mut config = if config_path.exists() {
                    wikify::Config::load(&config_path).map_err(|e| anyhow::anyhow!("{e}"))?
                } else {
                    wikify::Config::default()
                };

                match key.as_str() {
                    "style" => {
                        let style: LinkStyle = value.parse()?;
                        config.style = style;
                        config
                            .save(&config_path)
                            .map_err(|e| anyhow::anyhow!("{e}"))?;

                        println!("{}", format!("Rewrite style: {style}").success());

                        if style == LinkStyle::Legacy {
                            println!("\n{}", "Legacy style:".info());
                            println!(
                                "  • Reproduces the original script, including its dropped \
                                 closing parenthesis."
                            );
                        } else {
                            println!("\n{}", "Balanced style:".info());
                            println!("  • Keeps the closing parenthesis of rewritten links.");
                            println!(
                                "  • Content already published with the legacy style will \
                                 differ on republish."
                            );
                        }
                    }
                    "extension" => {
                        config
                            .set_extension(&value)
                            .map_err(|e| anyhow::anyhow!("{e}"))?;
                        config
                            .save(&config_path)
                            .map_err(|e| anyhow::anyhow!("{e}"))?;

                        println!(
                            "{}",
                            format!("Markdown extension: {}", config.extension()).success()
                        );
                    }
                    "follow_symlinks" => {
                        let bool_value = value
                            .parse::<bool>()
                            .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?;

                        config.follow_symlinks = bool_value;
                        config
                            .save(&config_path)
                            .map_err(|e| anyhow::anyhow!("{e}"))?;

                        println!(
                            "{}",
                            format!("Follow symlinks: {bool_value}").success()
                        );
                        if bool_value {
                            println!(
                                "\n{}",
                                "Link cycles under the root will make the traversal fail."
                                    .warning()
                            );
                        }
                    }
                    _ => {
                        return Err(anyhow::anyhow!(
                            "Unknown configuration key: '{key}'\nSupported keys: style, \
                             extension, follow_symlinks",
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
