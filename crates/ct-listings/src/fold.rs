//! Folding markup for code listings.
//!
//! Folding hides runs of lines (import blocks, marked regions) behind an
//! interactive show/hide affordance. The engine scans the listing's lines
//! with the configured [`Folder`] strategies, partitions them into
//! alternating plain and foldable blocks, and renders nested `<span>`
//! elements carrying the visibility classes the stylesheet and page script
//! recognize:
//!
//! - `fold-block hide-when-unfolded` wraps the collapsed-state preview text
//! - `fold-block hide-when-folded` wraps foldable content
//! - `fold-block` alone wraps always-visible content
//!
//! When no block is foldable the original text is returned unchanged, so
//! listings without imports or fold markers render exactly as written.

use ct_language::Language;
use ct_options::{ListingOption, Options};

const TAG_PREFIX: &str = "//";
const TAG_ON: &str = "@fold:on";
const TAG_OFF: &str = "@fold:off";

/// Toggles for the fold engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOption {
    /// Fold `import ` line blocks.
    Imports,
    /// Fold regions delimited by `// @fold:on` / `// @fold:off` comments.
    Tags,
}

impl FoldOption {
    /// Toggles active when no directive is given.
    pub const DEFAULTS: &'static [Self] = Self::MEMBERS;
}

impl ListingOption for FoldOption {
    const MEMBERS: &'static [Self] = &[Self::Imports, Self::Tags];

    fn parse_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "imports" => Some(Self::Imports),
            "tags" => Some(Self::Tags),
            _ => None,
        }
    }
}

/// Add folding markup to listing text.
///
/// Returns the content unchanged when the language is not Java-like or no
/// block is foldable under the active toggles.
#[must_use]
pub fn fold(content: &str, language: Option<Language>, options: &Options<FoldOption>) -> String {
    if !ct_language::is_java_like(language) {
        return content.to_owned();
    }
    let mut folders: Vec<Box<dyn Folder>> = Vec::new();
    if options.has(FoldOption::Imports) {
        folders.push(Box::new(ImportsFolder));
    }
    if options.has(FoldOption::Tags) {
        folders.push(Box::new(TagFolder::new(TAG_PREFIX, TAG_ON, TAG_OFF)));
    }
    let lines = split_lines(content);
    let blocks = FoldBlocks::scan(&lines, &folders);
    if blocks.is_foldable() {
        render(&blocks)
    } else {
        content.to_owned()
    }
}

/// Remove fold marker comment lines without adding markup.
///
/// Used for output targets that cannot fold; the markers are author
/// scaffolding, not listing content.
pub(crate) fn remove_fold_markers(content: &str) -> String {
    content
        .split_inclusive('\n')
        .filter(|line| {
            let trimmed = line.trim();
            !(trimmed.starts_with(TAG_PREFIX)
                && (trimmed.contains(TAG_ON) || trimmed.contains(TAG_OFF)))
        })
        .collect()
}

/// Split listing text into lines, stripping one trailing `\r` per line and
/// dropping trailing empty lines.
fn split_lines(content: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Strategy that recognizes the start and end of a foldable region.
///
/// `is_start_consumed` / `is_end_consumed` declare whether the marker lines
/// are themselves part of the block: import lines are the content, while
/// `@fold` comment markers are pure delimiters.
trait Folder {
    fn is_start(&self, lines: &[&str], index: usize) -> bool;

    fn is_end(&self, lines: &[&str], index: usize) -> bool;

    fn is_start_consumed(&self) -> bool {
        false
    }

    fn is_end_consumed(&self) -> bool {
        false
    }

    fn when_folded_content(&self, _fold_start_line: &str) -> Option<String> {
        None
    }
}

/// Folds contiguous `import ` lines, interior blank lines included.
struct ImportsFolder;

impl ImportsFolder {
    fn is_import(line: &str) -> bool {
        line.starts_with("import ")
    }
}

impl Folder for ImportsFolder {
    fn is_start(&self, lines: &[&str], index: usize) -> bool {
        Self::is_import(lines[index])
    }

    fn is_end(&self, lines: &[&str], index: usize) -> bool {
        match lines.get(index + 1) {
            Some(next) => !(next.trim().is_empty() || Self::is_import(next)),
            None => true,
        }
    }

    fn is_start_consumed(&self) -> bool {
        true
    }

    fn is_end_consumed(&self) -> bool {
        true
    }
}

/// Folds regions delimited by marker comments, with optional preview text
/// after the opening marker.
struct TagFolder {
    prefix: &'static str,
    on: &'static str,
    off: &'static str,
}

impl TagFolder {
    fn new(prefix: &'static str, on: &'static str, off: &'static str) -> Self {
        Self { prefix, on, off }
    }

    fn is_prefixed(&self, line: &str) -> bool {
        line.trim().starts_with(self.prefix)
    }
}

impl Folder for TagFolder {
    fn is_start(&self, lines: &[&str], index: usize) -> bool {
        self.is_prefixed(lines[index]) && lines[index].contains(self.on)
    }

    fn is_end(&self, lines: &[&str], index: usize) -> bool {
        self.is_prefixed(lines[index]) && lines[index].contains(self.off)
    }

    fn when_folded_content(&self, fold_start_line: &str) -> Option<String> {
        fold_start_line
            .find(self.on)
            .map(|at| fold_start_line[at + self.on.len()..].trim().to_owned())
    }
}

/// A contiguous run of lines, optionally owned by the folder that produced
/// it. Blocks without a folder are always-visible segments.
struct FoldBlock<'a> {
    folder: Option<&'a dyn Folder>,
    start_line: &'a str,
    lines: &'a [&'a str],
}

impl FoldBlock<'_> {
    fn has_folder(&self) -> bool {
        self.folder.is_some()
    }

    fn has_lines(&self) -> bool {
        !self.lines.is_empty()
    }

    fn when_folded_content(&self) -> Option<String> {
        self.folder
            .and_then(|folder| folder.when_folded_content(self.start_line))
    }
}

/// The ordered partition of a listing's lines into fold blocks.
struct FoldBlocks<'a> {
    blocks: Vec<FoldBlock<'a>>,
}

impl<'a> FoldBlocks<'a> {
    /// Scan the line array, alternating between plain accumulation and an
    /// open fold, and emit the surviving (non-empty) blocks in order.
    fn scan(lines: &'a [&'a str], folders: &'a [Box<dyn Folder>]) -> Self {
        let mut blocks: Vec<FoldBlock<'a>> = Vec::new();
        let mut current: Option<&dyn Folder> = None;
        let mut start = 0;
        for index in 0..lines.len() {
            if let Some(folder) = current {
                if folder.is_end(lines, index) {
                    blocks.push(Self::cut(Some(folder), lines, start, index + 1));
                    start = index + 1;
                    current = None;
                }
            } else if let Some(folder) = folders.iter().find(|folder| folder.is_start(lines, index))
            {
                blocks.push(Self::cut(None, lines, start, index));
                start = index;
                current = Some(folder.as_ref());
            }
        }
        if start < lines.len() {
            blocks.push(Self::cut(current, lines, start, lines.len()));
        }
        blocks.retain(FoldBlock::has_lines);
        Self { blocks }
    }

    /// Cut the block covering the scanned region `[start, end)`, applying
    /// the folder's marker consumption rules.
    fn cut(
        folder: Option<&'a dyn Folder>,
        lines: &'a [&'a str],
        start: usize,
        end: usize,
    ) -> FoldBlock<'a> {
        let from = match folder {
            Some(folder) if !folder.is_start_consumed() => start + 1,
            _ => start,
        };
        let to = match folder {
            Some(folder) if !folder.is_end_consumed() => end - 1,
            _ => end,
        };
        FoldBlock {
            folder,
            start_line: lines[start],
            lines: if from < to { &lines[from..to] } else { &[] },
        }
    }

    fn is_foldable(&self) -> bool {
        self.blocks.iter().any(FoldBlock::has_folder)
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Render the blocks as nested spans with fold visibility classes.
fn render(blocks: &FoldBlocks<'_>) -> String {
    let mut html = String::new();
    let count = blocks.blocks.len();
    for (index, block) in blocks.blocks.iter().enumerate() {
        if let Some(preview) = block.when_folded_content().filter(|text| !text.is_empty()) {
            html.push_str("<span class=\"fold-block hide-when-unfolded\">");
            html.push_str(&indent_match(block, &preview));
            html.push_str("\n\n");
            html.push_str("</span>");
        }
        html.push_str("<span class=\"fold-block");
        if block.has_folder() {
            html.push_str(" hide-when-folded");
        }
        html.push_str("\">");
        write_lines(&mut html, block.lines, index + 1 < count);
        html.push_str("</span>");
    }
    html
}

/// Write block lines, suppressing leading blank lines. A closing newline is
/// added only when the last written line is non-blank and another block
/// follows, so removed delimiter lines keep their vertical space.
fn write_lines(html: &mut String, lines: &[&str], end_with_newline: bool) {
    let mut last_line: Option<&str> = None;
    let mut written = false;
    for &line in lines {
        if is_blank(line) && !written {
            continue;
        }
        html.push_str(line);
        html.push('\n');
        written = true;
        last_line = Some(line);
    }
    if end_with_newline && !last_line.is_some_and(is_blank) {
        html.push('\n');
    }
}

/// Prefix the preview text with the leading whitespace of the block's first
/// non-blank line, so the collapsed preview lines up with the code.
fn indent_match(block: &FoldBlock<'_>, text: &str) -> String {
    for line in block.lines {
        if !is_blank(line) {
            let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            return format!("{indent}{text}");
        }
    }
    text.to_owned()
}
