//! Line-level helpers shared by the strategies

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;

/// Path-looking token with an extension, e.g. `app/(tabs)/index.tsx` or `../x.ts`.
static PATH_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\.{0,2}/)?(?:[\w@()\[\]+.-]+/)*[\w@()\[\]+-][\w@()\[\]+.-]*\.[A-Za-z][A-Za-z0-9]{0,9}\b")
        .expect("path token pattern is valid")
});

static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s").expect("list item pattern is valid"));

/// `END FILE`, `--- END FILE ---`, `END_FILE`, `// END OF FILE`
static END_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\s#*/<!=\-\[]*(?i:end[ _-]?(?:of[ _-]?)?file)\b[\s#*/>=\-\]]*$")
        .expect("end marker pattern is valid")
});

const KNOWN_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "json", "css", "scss", "html", "md", "mdx", "svg",
    "png", "jpg", "jpeg", "gif", "ttf", "otf", "yaml", "yml", "toml", "txt", "env", "sh", "lock",
    "gradle", "kt", "java", "swift", "xml", "plist", "properties",
];

/// First path-looking token in `line` whose extension is a known project file type
pub(crate) fn path_token(line: &str) -> Option<&str> {
    PATH_TOKEN
        .find_iter(line)
        .map(|m| m.as_str())
        .find(|token| {
            token
                .rsplit_once('.')
                .is_some_and(|(_, ext)| KNOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
}

/// True when `raw`, minus quotes and emphasis, is exactly one path token
pub(crate) fn looks_like_path(raw: &str) -> bool {
    let candidate = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '`' | '*' | '"' | '\'' | ':'));
    !candidate.is_empty() && !candidate.contains("://") && path_token(candidate) == Some(candidate)
}

/// Remove comment closers and rule decoration after a header path
pub(crate) fn trim_header_tail(raw: &str) -> &str {
    let mut s = raw.trim();
    loop {
        let next = s
            .trim_end_matches("-->")
            .trim_end_matches("*/")
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '=' | '#'));
        if next == s {
            return s;
        }
        s = next;
    }
}

/// Explicit end-of-block line: an end-file marker, `[END]` or a `[/...]` closer
pub(crate) fn is_end_marker(line: &str) -> bool {
    let t = line.trim();
    END_MARKER.is_match(t)
        || t.eq_ignore_ascii_case("[end]")
        || (t.starts_with("[/") && t.ends_with(']'))
}

/// Opening or closing code fence (three or more backticks or tildes)
pub(crate) fn is_fence_line(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("```") || t.starts_with("~~~")
}

/// Info string of a fence line, empty for a bare fence
pub(crate) fn fence_info(line: &str) -> &str {
    line.trim_start()
        .trim_start_matches(['`', '~'])
        .trim()
}

/// Lines that can introduce a file: headings, emphasis, inline code, labels, list items
pub(crate) fn is_heading_like(line: &str) -> bool {
    let t = line.trim();
    t.starts_with(['#', '*', '`', '-', '>', '_'])
        || t.starts_with(|c: char| !c.is_ascii())
        || LIST_ITEM.is_match(t)
        || t.ends_with(':')
        || t.contains('`')
        || looks_like_path(t)
}

/// A fenced code block located with pulldown-cmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FencedBlock {
    /// Trimmed info string
    pub(crate) info: String,
    /// Raw body without the fences
    pub(crate) body: String,
    /// Byte offset of the opening fence
    pub(crate) start: usize,
}

impl FencedBlock {
    /// Language tag (first word of the info string), lowercased
    pub(crate) fn language(&self) -> String {
        self.info
            .split(|c: char| c.is_whitespace() || c == ':' || c == '{')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

/// All fenced code blocks in document order
///
/// An unterminated fence runs to the end of the blob.
pub(crate) fn fenced_blocks(blob: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<FencedBlock> = None;

    for (event, range) in Parser::new(blob).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some(FencedBlock {
                    info: info.trim().to_string(),
                    body: String::new(),
                    start: range.start,
                });
            }
            Event::Text(text) => {
                if let Some(block) = current.as_mut() {
                    block.body.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }

    blocks
}

/// Closest non-blank line that ends before the line containing `offset`
pub(crate) fn preceding_line(blob: &str, offset: usize) -> Option<&str> {
    let line_start = blob[..offset].rfind('\n')?;
    blob[..line_start]
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
}
