//! Comment annotation scanning
//!
//! Finds `TODO:`, `FIXME:`, `NOTE:`, `XXX:` and `HACK:` tags in line comments
//! (`//`, `#`, `--`) and block comments (`/* */`, `/** */`) and turns each one
//! into a root-level [`StructureNode`]. Inside a block comment a tag may open
//! the comment or start any of its `*` continuation lines.
//!
//! Both patterns run independently over the whole buffer, so a tag that both
//! patterns can see is reported twice. Callers tolerate the duplicate.

use std::sync::LazyLock;

use regex::Regex;

use super::{OutlineRange, Position, StructureKind, StructureNode};
use crate::error::OutlineError;

const SINGLE_LINE_PATTERN: &str = r"(?m)(?://+|#|--)[ \t]*(TODO|FIXME|NOTE|XXX|HACK):(.*)$";
const BLOCK_PATTERN: &str = r"(?s)/\*.*?\*/";
const BLOCK_TAG_PATTERN: &str = r"(?m)(?:^|/\*\*?)[ \t]*\*?[ \t]*(TODO|FIXME|NOTE|XXX|HACK):";
const CONTINUATION_PATTERN: &str = r"[ \t]*\r?\n\s*\*?[ \t]*";

static SINGLE_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(SINGLE_LINE_PATTERN));
static BLOCK: LazyLock<Option<Regex>> = LazyLock::new(|| compile(BLOCK_PATTERN));
static BLOCK_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| compile(BLOCK_TAG_PATTERN));
static CONTINUATION: LazyLock<Option<Regex>> = LazyLock::new(|| compile(CONTINUATION_PATTERN));

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!("Failed to compile annotation pattern {:?}: {}", pattern, e);
            None
        }
    }
}

/// Recognized comment tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationTag {
    Todo,
    Fixme,
    Note,
    Xxx,
    Hack,
}

impl AnnotationTag {
    /// Parse a tag token, ignoring case
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "TODO" => Some(AnnotationTag::Todo),
            "FIXME" => Some(AnnotationTag::Fixme),
            "NOTE" => Some(AnnotationTag::Note),
            "XXX" => Some(AnnotationTag::Xxx),
            "HACK" => Some(AnnotationTag::Hack),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationTag::Todo => "TODO",
            AnnotationTag::Fixme => "FIXME",
            AnnotationTag::Note => "NOTE",
            AnnotationTag::Xxx => "XXX",
            AnnotationTag::Hack => "HACK",
        }
    }

    /// Outline kind for this tag (XXX and HACK fold into notes)
    pub fn kind(&self) -> StructureKind {
        match self {
            AnnotationTag::Todo => StructureKind::Todo,
            AnnotationTag::Fixme => StructureKind::Fixme,
            AnnotationTag::Note | AnnotationTag::Xxx | AnnotationTag::Hack => StructureKind::Note,
        }
    }
}

/// Byte offset → (line, char column) lookup for one buffer snapshot
struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = self
            .text
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        Position::new(line, column)
    }
}

/// Scan buffer text for annotation nodes
///
/// Never fails: a pattern that did not compile contributes nothing, and a
/// tag with no text after the colon is skipped.
pub fn scan_annotations(text: &str) -> Vec<StructureNode> {
    let index = LineIndex::new(text);
    let mut nodes = scan_single_line(text, &index);
    nodes.extend(scan_block(text, &index));
    nodes
}

fn scan_single_line(text: &str, index: &LineIndex) -> Vec<StructureNode> {
    let Some(re) = SINGLE_LINE.as_ref() else {
        return Vec::new();
    };

    let mut nodes = Vec::new();
    for caps in re.captures_iter(text) {
        let (Some(tag_match), Some(body)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(tag) = AnnotationTag::parse(tag_match.as_str()) else {
            continue;
        };

        let name = body.as_str().trim();
        let start = index.position(tag_match.start());
        if name.is_empty() {
            let err = OutlineError::MalformedAnnotation {
                tag: tag.as_str(),
                line: start.line,
            };
            tracing::debug!("Skipping annotation: {}", err);
            continue;
        }

        // `$` stops before '\n' but a CRLF buffer leaves the '\r' in the match
        let end_offset = if body.as_str().ends_with('\r') {
            body.end() - 1
        } else {
            body.end()
        };
        let end = index.position(end_offset);

        nodes.push(
            StructureNode::new(name, tag.kind(), OutlineRange::new(start, end))
                .with_detail(tag.as_str()),
        );
    }
    nodes
}

fn scan_block(text: &str, index: &LineIndex) -> Vec<StructureNode> {
    let (Some(block_re), Some(tag_re)) = (BLOCK.as_ref(), BLOCK_TAG.as_ref()) else {
        return Vec::new();
    };

    let mut nodes = Vec::new();
    for block in block_re.find_iter(text) {
        let comment = block.as_str();
        let range = OutlineRange::new(index.position(block.start()), index.position(block.end()));
        // body ends before the closing `*/`
        let body_end = comment.len() - 2;

        // A tag opens the comment or starts one of its lines; its text runs
        // until the next tag or the end of the comment.
        let tags: Vec<_> = tag_re
            .captures_iter(comment)
            .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?)))
            .collect();
        for (i, (_, tag_match)) in tags.iter().enumerate() {
            let Some(tag) = AnnotationTag::parse(tag_match.as_str()) else {
                continue;
            };
            let body_start = tag_match.end() + 1;
            let next = tags.get(i + 1).map_or(body_end, |(start, _)| *start);
            let body = comment.get(body_start..next.max(body_start)).unwrap_or("");

            let name = flatten_block_body(body);
            if name.is_empty() {
                let err = OutlineError::MalformedAnnotation {
                    tag: tag.as_str(),
                    line: index.position(block.start() + tag_match.start()).line,
                };
                tracing::debug!("Skipping annotation: {}", err);
                continue;
            }

            nodes.push(StructureNode::new(name, tag.kind(), range).with_detail(tag.as_str()));
        }
    }
    nodes
}

/// Join a multi-line comment body into one line, dropping `*` continuation markers
fn flatten_block_body(body: &str) -> String {
    let flattened = match CONTINUATION.as_ref() {
        Some(re) => re.replace_all(body, " ").into_owned(),
        None => body.replace(['\r', '\n'], " "),
    };
    flattened.trim().to_string()
}
