//! Boilerplate removal for code listings.
//!
//! Published listings usually omit the ceremony that real source files carry:
//! license banners, package statements, formatter control comments, and
//! `@SuppressWarnings` annotations. The chomp pipeline rewrites listing text
//! before rendering, applying an ordered list of independent rules gated by
//! [`ChompOption`] toggles. Authors can also mark text for removal inline
//! with `/**/`, `@chomp:line`, and `@chomp:file` comment markers.
//!
//! Chomping operates on raw text with regular expressions; it never parses
//! the source and does not guarantee the result still compiles.

use std::sync::LazyLock;

use ct_language::Language;
use ct_options::{ListingOption, Options};
use regex::{NoExpand, Regex};

/// Toggles for the chomp pipeline, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChompOption {
    /// Strip everything before the package statement (license banners).
    Headers,
    /// Remove or replace the package statement itself.
    Packages,
    /// Apply inline `/**/`, `@chomp:line`, and `@chomp:file` markers.
    Tags,
    /// Remove `// @formatter:on` / `// @formatter:off` marker lines.
    Formatters,
    /// Remove `@SuppressWarnings` / `@Suppress` annotations.
    SuppressWarnings,
}

impl ChompOption {
    /// Toggles active when no directive is given.
    pub const DEFAULTS: &'static [Self] = Self::MEMBERS;
}

impl ListingOption for ChompOption {
    const MEMBERS: &'static [Self] = &[
        Self::Headers,
        Self::Packages,
        Self::Tags,
        Self::Formatters,
        Self::SuppressWarnings,
    ];

    fn parse_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "headers" => Some(Self::Headers),
            "packages" => Some(Self::Packages),
            "tags" => Some(Self::Tags),
            "formatters" => Some(Self::Formatters),
            "suppresswarnings" => Some(Self::SuppressWarnings),
            _ => None,
        }
    }
}

/// Chomp listing text.
///
/// Applies the active rules in fixed order (headers, packages, tags,
/// formatters, suppress-warnings). Returns the content unchanged when the
/// language is absent or not Java-like.
#[must_use]
pub fn chomp(
    content: &str,
    language: Option<Language>,
    options: &Options<ChompOption>,
    package_replacement: Option<&str>,
) -> String {
    let Some(language) = language.filter(|language| language.is_java_like()) else {
        return content.to_owned();
    };
    let mut chompers: Vec<Box<dyn Chomper>> = Vec::new();
    if options.has(ChompOption::Headers) {
        chompers.push(Box::new(HeaderChomper::new(language)));
    }
    if options.has(ChompOption::Packages) {
        chompers.push(Box::new(PackageChomper::new(language, package_replacement)));
    }
    if options.has(ChompOption::Tags) {
        chompers.push(Box::new(TagChomper));
    }
    if options.has(ChompOption::Formatters) {
        chompers.push(Box::new(FormatterChomper));
    }
    if options.has(ChompOption::SuppressWarnings) {
        chompers.push(Box::new(SuppressWarningsChomper));
    }
    let mut content = content.to_owned();
    for chomper in &chompers {
        content = chomper.chomp(&content);
    }
    content
}

/// Strategy used to chomp content. Each rule is a pure `text -> text`
/// function; absence of its pattern is a no-op, never an error.
trait Chomper {
    fn chomp(&self, content: &str) -> String;
}

/// Strips everything before the package statement, keeping the statement.
struct HeaderChomper {
    pattern: Regex,
}

impl HeaderChomper {
    fn new(language: Language) -> Self {
        let terminator = regex::escape(language.statement_terminator());
        Self {
            pattern: Regex::new(&format!(r"(?s)^.*?(package [\w.]+{terminator})")).unwrap(),
        }
    }
}

impl Chomper for HeaderChomper {
    fn chomp(&self, content: &str) -> String {
        match self.pattern.captures(content) {
            Some(captures) => {
                let matched = captures.get(0).unwrap();
                let statement = captures.get(1).unwrap().as_str();
                let mut updated = String::with_capacity(content.len());
                updated.push_str(statement);
                updated.push_str(&content[matched.end()..]);
                updated
            }
            None => content.to_owned(),
        }
    }
}

/// Removes the package statement, or swaps in a replacement package name.
struct PackageChomper {
    pattern: Regex,
    replacement: String,
}

impl PackageChomper {
    fn new(language: Language, replacement: Option<&str>) -> Self {
        let terminator = language.statement_terminator();
        let escaped = regex::escape(terminator);
        Self {
            pattern: Regex::new(&format!(r"package [\w.]+{escaped}\s*")).unwrap(),
            replacement: match replacement {
                Some(name) if !name.is_empty() => format!("package {name}{terminator}\n\n"),
                _ => String::new(),
            },
        }
    }
}

impl Chomper for PackageChomper {
    fn chomp(&self, content: &str) -> String {
        self.pattern
            .replace(content, NoExpand(&self.replacement))
            .into_owned()
    }
}

static SHORT_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)/\*\*/.*$").unwrap());

static BLOCK_LINE_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)/\*\s*@chomp:line(.*)\*/.*$").unwrap());

static LINE_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//\s*@chomp:line(.*)$").unwrap());

static FILE_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(//|/\*)\s*@chomp:file").unwrap());

/// Applies inline comment markers: `/**/` truncates the rest of the line to
/// `...`, `@chomp:line` replaces from the marker to end of line, and the
/// first `@chomp:file` discards everything from the marker onward.
struct TagChomper;

impl Chomper for TagChomper {
    fn chomp(&self, content: &str) -> String {
        let content = SHORT_TAG_PATTERN.replace_all(content, "...");
        let content = BLOCK_LINE_TAG_PATTERN
            .replace_all(&content, |captures: &regex::Captures<'_>| {
                captures.get(1).unwrap().as_str().trim().to_owned()
            });
        let content = LINE_TAG_PATTERN.replace_all(&content, |captures: &regex::Captures<'_>| {
            captures.get(1).unwrap().as_str().trim().to_owned()
        });
        match FILE_TAG_PATTERN.find(&content) {
            Some(matched) => content.as_ref()[..matched.start()].to_owned(),
            None => content.into_owned(),
        }
    }
}

static FORMATTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*//\s*@formatter:(on|off).*$\n?").unwrap());

/// Removes lines that are solely a `// @formatter:on|off` marker.
struct FormatterChomper;

impl Chomper for FormatterChomper {
    fn chomp(&self, content: &str) -> String {
        FORMATTER_PATTERN.replace_all(content, "").into_owned()
    }
}

static SUPPRESS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(?:SuppressWarnings|Suppress)\s*\([^)]*\)[ \t]?").unwrap());

/// Removes `@SuppressWarnings(...)` / `@Suppress(...)` annotation text.
///
/// A line that held nothing but the annotation is dropped entirely; a line
/// that was already blank, or still has other content, is kept.
struct SuppressWarningsChomper;

impl Chomper for SuppressWarningsChomper {
    fn chomp(&self, content: &str) -> String {
        let mut output = String::with_capacity(content.len());
        for line in content.split_inclusive('\n') {
            let (body, newline) = match line.strip_suffix('\n') {
                Some(body) => (body, "\n"),
                None => (line, ""),
            };
            if !SUPPRESS_PATTERN.is_match(body) {
                output.push_str(line);
                continue;
            }
            let stripped = SUPPRESS_PATTERN.replace_all(body, "");
            if stripped.trim().is_empty() && !body.trim().is_empty() {
                continue;
            }
            output.push_str(&stripped);
            output.push_str(newline);
        }
        output
    }
}
