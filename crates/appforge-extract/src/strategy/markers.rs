//! Explicit marker blocks
//!
//! Five header conventions are tried in order. The first convention with any
//! header in the blob is used exclusively, so a response written with `FILE:`
//! markers never picks up stray fences as extra files.

use super::{ExtractionStrategy, StrategyOutput};
use crate::audit::RawCandidate;
use crate::config::ExtractorConfig;
use crate::residue::trim_body;
use crate::text::{
    fenced_blocks, is_end_marker, is_fence_line, is_heading_like, looks_like_path, path_token,
    preceding_line, trim_header_tail,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// `FILE: x`, `### FILE: x`, `**File:** x`, `// FILE: x`, `--- FILE: x ---`, `File path: x`
static FILE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<lead>[\s#*/>=<!|\-\[]*)(?P<key>(?i:file(?:[ _-]?(?:path|name))?))\s*\**\s*:\s*(?P<path>\S.*)$",
    )
    .expect("file marker pattern is valid")
});

/// `[path]` or `[[path]]` alone on a line
static BRACKET_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\[\[?(?P<path>[^\s\[/].*?)\]\]?\s*$").expect("bracket header pattern is valid")
});

/// `title="x"`, `file=x`, `filename='x'`, `path=x` inside a fence info string
static INFO_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:title|file(?:name)?|path)\s*=\s*["']?(?P<path>[^"'\s}]+)"#)
        .expect("info attribute pattern is valid")
});

/// `// x`, `/* x */`, `<!-- x -->`, `-- x`
static COMMENT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?://+|/\*+|<!--+|--+)\s*(?P<path>\S.*)$").expect("comment header pattern is valid")
});

/// Header conventions, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderVariant {
    /// `FILE: <path>` lines, closed by the next marker or an end-file line
    FileMarker,
    /// `[<path>]` lines, closed by the next header, `[END]` or `[/...]`
    BracketedPath,
    /// Fence whose info string names the path
    FenceInfo,
    /// Fence preceded by a heading, bold or inline-code line naming the path
    HeadingBeforeFence,
    /// Comment line naming the path, running to the next comment header or fence
    CommentHeader,
}

impl HeaderVariant {
    /// All variants in priority order
    pub const ALL: [Self; 5] = [
        Self::FileMarker,
        Self::BracketedPath,
        Self::FenceInfo,
        Self::HeadingBeforeFence,
        Self::CommentHeader,
    ];

    /// Stable name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FileMarker => "file_marker",
            Self::BracketedPath => "bracketed_path",
            Self::FenceInfo => "fence_info",
            Self::HeadingBeforeFence => "heading_before_fence",
            Self::CommentHeader => "comment_header",
        }
    }

    /// Candidates for this convention alone
    #[must_use]
    pub fn scan(self, blob: &str) -> Vec<RawCandidate> {
        match self {
            Self::FileMarker => scan_file_markers(blob),
            Self::BracketedPath => scan_bracketed(blob),
            Self::FenceInfo => scan_fence_info(blob),
            Self::HeadingBeforeFence => scan_heading_before_fence(blob),
            Self::CommentHeader => scan_comment_headers(blob),
        }
    }
}

/// Cascade step 1: explicit path headers
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerBlockStrategy;

impl ExtractionStrategy for MarkerBlockStrategy {
    fn name(&self) -> &'static str {
        "marker_blocks"
    }

    fn extract(&self, blob: &str, _config: &ExtractorConfig) -> Option<StrategyOutput> {
        HeaderVariant::ALL.into_iter().find_map(|variant| {
            StrategyOutput::new(variant.scan(blob))
                .with_variant(variant.as_str())
                .non_empty()
        })
    }
}

/// Accumulates one block body under a header
struct OpenBlock<'a> {
    raw_path: String,
    lines: Vec<&'a str>,
}

impl<'a> OpenBlock<'a> {
    fn new(raw_path: &str) -> Self {
        Self {
            raw_path: raw_path.to_string(),
            lines: Vec::new(),
        }
    }

    fn close(self) -> RawCandidate {
        let content = trim_body(&self.lines.join("\n"), &self.raw_path);
        RawCandidate::new(self.raw_path, content)
    }
}

/// Where a candidate header line sits
#[derive(Debug, Clone, Copy)]
struct LineContext<'a> {
    in_block: bool,
    next: Option<&'a str>,
}

/// Line-oriented scan shared by the marker, bracket and comment conventions
fn scan_lines<'a>(
    blob: &'a str,
    header: impl Fn(&'a str, LineContext<'a>) -> Option<&'a str>,
    closes: impl Fn(&str) -> bool,
) -> Vec<RawCandidate> {
    let mut out = Vec::new();
    let mut open: Option<OpenBlock<'a>> = None;
    let mut lines = blob.lines().peekable();

    while let Some(line) = lines.next() {
        let context = LineContext {
            in_block: open.is_some(),
            next: lines.peek().copied(),
        };
        if let Some(path) = header(line, context) {
            out.extend(open.take().map(OpenBlock::close));
            open = Some(OpenBlock::new(path));
        } else if closes(line) {
            out.extend(open.take().map(OpenBlock::close));
        } else if let Some(block) = open.as_mut() {
            block.lines.push(line);
        }
    }
    out.extend(open.map(OpenBlock::close));
    out
}

/// A parsed `FILE:` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileMarker<'a> {
    path: &'a str,
    /// Decorated (`#`, `**`, `//`, `---`, ...) or written as uppercase `FILE`
    emphatic: bool,
}

fn file_marker(line: &str) -> Option<FileMarker<'_>> {
    let caps = FILE_MARKER.captures(line)?;
    let path = trim_header_tail(caps.name("path")?.as_str());
    if path.is_empty() {
        return None;
    }
    let decorated = caps.name("lead").is_some_and(|m| !m.as_str().trim().is_empty());
    let uppercase = caps.name("key").is_some_and(|m| m.as_str().starts_with("FILE"));
    Some(FileMarker {
        path,
        emphatic: decorated || uppercase,
    })
}

/// Inside an open block only an emphatic marker, or one followed by a fence,
/// starts a new file; `filePath: string;` is block content.
fn file_marker_header<'a>(line: &'a str, context: LineContext<'_>) -> Option<&'a str> {
    let marker = file_marker(line)?;
    let fenced = context.next.is_some_and(is_fence_line);
    let accepted = if context.in_block {
        marker.emphatic || fenced
    } else {
        marker.emphatic || fenced || looks_like_path(marker.path)
    };
    accepted.then_some(marker.path)
}

fn scan_file_markers(blob: &str) -> Vec<RawCandidate> {
    scan_lines(blob, file_marker_header, is_end_marker)
}

fn bracket_path(line: &str) -> Option<&str> {
    let caps = BRACKET_HEADER.captures(line)?;
    let path = caps.name("path")?.as_str().trim();
    (looks_like_path(path) && !path.eq_ignore_ascii_case("end")).then_some(path)
}

fn scan_bracketed(blob: &str) -> Vec<RawCandidate> {
    scan_lines(blob, |line, _| bracket_path(line), is_end_marker)
}

fn info_path(info: &str) -> Option<&str> {
    if let Some(caps) = INFO_ATTRIBUTE.captures(info) {
        return caps.name("path").map(|m| m.as_str());
    }
    info.split(|c: char| c.is_whitespace() || c == ':')
        .find(|token| looks_like_path(token))
}

fn scan_fence_info(blob: &str) -> Vec<RawCandidate> {
    fenced_blocks(blob)
        .into_iter()
        .filter_map(|block| {
            let path = info_path(&block.info)?;
            Some(RawCandidate::new(path, trim_body(&block.body, path)))
        })
        .collect()
}

fn scan_heading_before_fence(blob: &str) -> Vec<RawCandidate> {
    fenced_blocks(blob)
        .into_iter()
        .filter_map(|block| {
            let line = preceding_line(blob, block.start)?;
            if is_fence_line(line) || !is_heading_like(line) {
                return None;
            }
            let path = path_token(line)?;
            Some(RawCandidate::new(path, trim_body(&block.body, path)))
        })
        .collect()
}

fn comment_path(line: &str) -> Option<&str> {
    let caps = COMMENT_HEADER.captures(line)?;
    let path = trim_header_tail(caps.name("path")?.as_str());
    looks_like_path(path).then_some(path)
}

fn scan_comment_headers(blob: &str) -> Vec<RawCandidate> {
    scan_lines(blob, |line, _| comment_path(line), is_fence_line)
}
