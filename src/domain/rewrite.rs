//! Rewriting of relative markdown links into flat wiki page names.
//!
//! Matching is purely textual and line-based. It is not markdown-aware:
//! a qualifying substring inside a code fence or inline code span is
//! rewritten like any other. Malformed link syntax is not an error; text
//! that does not match the pattern passes through untouched.

use std::{fmt, str::FromStr};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// How matched links are rewritten.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// Reproduce the original publishing script byte-for-byte.
    ///
    /// The match runs greedily from the opening parenthesis to the last
    /// `.md)` on the line, and the closing parenthesis is dropped from the
    /// replacement: `(../other/Getting-Started.md)` becomes
    /// `(Getting-Started`. Wikis published with the original script contain
    /// output in this form, so this is the default.
    #[default]
    Legacy,

    /// Corrected substitution.
    ///
    /// Each link on a line is matched individually and the closing
    /// parenthesis is retained: `(../other/Getting-Started.md)` becomes
    /// `(Getting-Started)`.
    Balanced,
}

impl fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Balanced => write!(f, "balanced"),
        }
    }
}

impl FromStr for LinkStyle {
    type Err = UnknownStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "balanced" => Ok(Self::Balanced),
            other => Err(UnknownStyleError(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognised style name.
#[derive(Debug, thiserror::Error)]
#[error("unknown link style '{0}' (expected 'legacy' or 'balanced')")]
pub struct UnknownStyleError(String);

/// The outcome of rewriting a single file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// The transformed content.
    pub content: String,

    /// The number of lines that were changed.
    pub lines_changed: usize,

    /// The total number of substitutions performed.
    pub replacements: usize,
}

/// A compiled link-rewriting engine.
///
/// The pattern is compiled once and applied line by line, so a line
/// containing no qualifying link is passed through unchanged.
#[derive(Debug, Clone)]
pub struct Rewriter {
    pattern: Regex,
    style: LinkStyle,
}

impl Rewriter {
    /// Builds a rewriter for the standard `md` extension.
    #[must_use]
    pub fn new(style: LinkStyle) -> Self {
        Self::with_extension(style, "md")
    }

    /// Builds a rewriter for an arbitrary markdown extension (without the
    /// leading dot).
    #[must_use]
    pub fn with_extension(style: LinkStyle, extension: &str) -> Self {
        let ext = regex::escape(extension);
        let pattern = match style {
            // Greedy: from the first '/' after the opening parenthesis to
            // the last '.md)' on the line.
            LinkStyle::Legacy => format!(r"\((?<path>.*)/(?<name>[^/]*)\.{ext}\)"),
            // One link per match; paths cannot contain whitespace or
            // parentheses.
            LinkStyle::Balanced => format!(r"\((?<path>[^()\s]*?/)(?<name>[^/()\s]+)\.{ext}\)"),
        };
        Self {
            pattern: Regex::new(&pattern).expect("pattern is statically well formed"),
            style,
        }
    }

    /// The style this rewriter was built with.
    #[must_use]
    pub const fn style(&self) -> LinkStyle {
        self.style
    }

    const fn replacement(&self) -> &'static str {
        match self.style {
            LinkStyle::Legacy => "(${name}",
            LinkStyle::Balanced => "(${name})",
        }
    }

    /// Counts the qualifying link patterns in `content` without rewriting.
    #[must_use]
    pub fn match_count(&self, content: &str) -> usize {
        content
            .split('\n')
            .map(|line| self.pattern.find_iter(line).count())
            .sum()
    }

    /// Rewrites every qualifying link in `content`.
    ///
    /// The transform is line-based and idempotent: rewritten links no longer
    /// carry the directory-prefix-plus-extension shape, so a second pass
    /// leaves them alone.
    #[must_use]
    pub fn rewrite(&self, content: &str) -> Rewritten {
        let mut lines_changed = 0;
        let mut replacements = 0;

        let rewritten: Vec<_> = content
            .split('\n')
            .map(|line| {
                let count = self.pattern.find_iter(line).count();
                if count == 0 {
                    return line.to_string();
                }
                lines_changed += 1;
                replacements += count;
                self.pattern
                    .replace_all(line, self.replacement())
                    .into_owned()
            })
            .collect();

        Rewritten {
            content: rewritten.join("\n"),
            lines_changed,
            replacements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_reproduces_original_substitution() {
        // The original script's quirk: the closing parenthesis is dropped.
        let rewriter = Rewriter::new(LinkStyle::Legacy);
        let outcome = rewriter.rewrite("See [Guide](../other/Getting-Started.md) for details.");

        assert_eq!(outcome.content, "See [Guide](Getting-Started for details.");
        assert_eq!(outcome.lines_changed, 1);
        assert_eq!(outcome.replacements, 1);
    }

    #[test]
    fn balanced_keeps_closing_parenthesis() {
        let rewriter = Rewriter::new(LinkStyle::Balanced);
        let outcome = rewriter.rewrite("See [Guide](../other/Getting-Started.md) for details.");

        assert_eq!(outcome.content, "See [Guide](Getting-Started) for details.");
        assert_eq!(outcome.replacements, 1);
    }

    #[test]
    fn legacy_greedy_match_spans_multiple_links() {
        // Two links on one line collapse into a single greedy match, exactly
        // as the original regular expression behaved.
        let rewriter = Rewriter::new(LinkStyle::Legacy);
        let outcome = rewriter.rewrite("(a/b.md) and (c/d.md)");

        assert_eq!(outcome.content, "(d");
        assert_eq!(outcome.replacements, 1);
    }

    #[test]
    fn balanced_rewrites_each_link_on_a_line() {
        let rewriter = Rewriter::new(LinkStyle::Balanced);
        let outcome = rewriter.rewrite("(a/b.md) and (c/d.md)");

        assert_eq!(outcome.content, "(b) and (d)");
        assert_eq!(outcome.replacements, 2);
    }

    #[test]
    fn lines_without_links_are_untouched() {
        let rewriter = Rewriter::new(LinkStyle::Legacy);
        let content = "# Heading\n\nPlain text with (parens) and a bare name.md mention.\n";
        let outcome = rewriter.rewrite(content);

        assert_eq!(outcome.content, content);
        assert_eq!(outcome.lines_changed, 0);
        assert_eq!(outcome.replacements, 0);
    }

    #[test]
    fn links_without_a_directory_prefix_are_untouched() {
        // The pattern requires a '/', so a same-directory link is left as-is.
        let rewriter = Rewriter::new(LinkStyle::Legacy);
        let outcome = rewriter.rewrite("See [Guide](Getting-Started.md) here.");

        assert_eq!(outcome.content, "See [Guide](Getting-Started.md) here.");
        assert_eq!(outcome.replacements, 0);
    }

    #[test]
    fn rewrite_is_idempotent() {
        for style in [LinkStyle::Legacy, LinkStyle::Balanced] {
            let rewriter = Rewriter::new(style);
            let once = rewriter.rewrite("See [Guide](docs/setup/Install.md) to begin.");
            let twice = rewriter.rewrite(&once.content);

            assert_eq!(twice.content, once.content);
            assert_eq!(twice.replacements, 0);
        }
    }

    #[test]
    fn multiple_qualifying_lines_are_all_rewritten() {
        let rewriter = Rewriter::new(LinkStyle::Legacy);
        let content = "[A](x/A.md)\nno link here\n[B](y/z/B.md)";
        let outcome = rewriter.rewrite(content);

        assert_eq!(outcome.content, "[A](A\nno link here\n[B](B");
        assert_eq!(outcome.lines_changed, 2);
        assert_eq!(outcome.replacements, 2);
    }

    #[test]
    fn custom_extension_is_respected() {
        let rewriter = Rewriter::with_extension(LinkStyle::Balanced, "markdown");
        let outcome = rewriter.rewrite("(docs/Page.markdown) but not (docs/Other.md)");

        assert_eq!(outcome.content, "(Page) but not (docs/Other.md)");
        assert_eq!(outcome.replacements, 1);
    }

    #[test]
    fn match_count_agrees_with_rewrite() {
        let rewriter = Rewriter::new(LinkStyle::Balanced);
        let content = "(a/b.md) (c/d.md)\n(e/f.md)";

        assert_eq!(rewriter.match_count(content), 3);
        assert_eq!(rewriter.rewrite(content).replacements, 3);
    }

    #[test]
    fn trailing_newline_is_preserved() {
        let rewriter = Rewriter::new(LinkStyle::Legacy);
        let outcome = rewriter.rewrite("[A](x/A.md)\n");

        assert_eq!(outcome.content, "[A](A\n");
    }

    #[test]
    fn style_parses_from_string() {
        assert_eq!("legacy".parse::<LinkStyle>().unwrap(), LinkStyle::Legacy);
        assert_eq!(
            "balanced".parse::<LinkStyle>().unwrap(),
            LinkStyle::Balanced
        );
        assert!("wiki".parse::<LinkStyle>().is_err());
    }
}
