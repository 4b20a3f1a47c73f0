//! Markdown-lite renderer for agent-authored text.
//!
//! Only three constructs are recognized:
//! - `**bold**` spans (non-greedy, single line, not nested)
//! - `- item` lines, grouped into one list per contiguous run
//! - paragraphs, with a blank line between two paragraph lines becoming an
//!   explicit break
//!
//! Anything else is passed through as literal text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern compiles"));

/// Marker that opens a list item.
const LIST_MARKER: &str = "- ";

/// An inline run of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Bold(String),
}

/// A block-level element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// One entry per list item, in source order.
    List(Vec<Vec<Inline>>),
    Break,
}

/// Rendered, display-ready structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flatten to terminal-friendly text: paragraphs on their own lines,
    /// list items prefixed with a bullet, breaks as blank lines.
    pub fn to_plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(inlines) => lines.push(flatten(inlines)),
                Block::List(items) => {
                    for item in items {
                        lines.push(format!("  • {}", flatten(item)));
                    }
                }
                Block::Break => lines.push(String::new()),
            }
        }
        lines.join("\n")
    }
}

fn flatten(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(s) | Inline::Bold(s) => s.as_str(),
        })
        .collect()
}

/// Split a single line into text and bold runs.
fn parse_inlines(line: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut cursor = 0;
    for caps in BOLD.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            inlines.push(Inline::Text(line[cursor..whole.start()].to_string()));
        }
        inlines.push(Inline::Bold(inner.as_str().to_string()));
        cursor = whole.end();
    }
    if cursor < line.len() {
        inlines.push(Inline::Text(line[cursor..].to_string()));
    }
    inlines
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Item,
    Text,
}

fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with(LIST_MARKER) {
        LineKind::Item
    } else {
        LineKind::Text
    }
}

/// Render markdown-lite text into a [`Document`].
///
/// Pure: the same input always yields the same output. Empty input yields an
/// empty document.
pub fn render(source: &str) -> Document {
    let lines: Vec<&str> = source.lines().collect();
    let kinds: Vec<LineKind> = lines.iter().map(|l| classify(l)).collect();

    let mut blocks = Vec::new();
    let mut open_list: Option<Vec<Vec<Inline>>> = None;
    // Kind of the last non-blank line, and whether blanks followed it.
    let mut previous: Option<LineKind> = None;
    let mut pending_blank = false;

    for (line, kind) in lines.iter().zip(kinds.iter().copied()) {
        match kind {
            LineKind::Blank => {
                if let Some(items) = open_list.take() {
                    blocks.push(Block::List(items));
                }
                pending_blank = true;
            }
            LineKind::Item => {
                let content = line.trim()[LIST_MARKER.len()..].trim();
                open_list
                    .get_or_insert_with(Vec::new)
                    .push(parse_inlines(content));
                previous = Some(LineKind::Item);
                pending_blank = false;
            }
            LineKind::Text => {
                if let Some(items) = open_list.take() {
                    blocks.push(Block::List(items));
                }
                if pending_blank && previous == Some(LineKind::Text) {
                    blocks.push(Block::Break);
                }
                blocks.push(Block::Paragraph(parse_inlines(line)));
                previous = Some(LineKind::Text);
                pending_blank = false;
            }
        }
    }

    if let Some(items) = open_list.take() {
        blocks.push(Block::List(items));
    }

    Document { blocks }
}
