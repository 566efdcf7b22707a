//! Canonical project paths
//!
//! Provides [`CanonicalPath`], the only key type accepted by [`FileSet`](crate::FileSet),
//! [`clean`], the fallible normalizer that turns a raw path string into one, and
//! [`clean_header`], which additionally drops prose a language model wrote after
//! the path on a header line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// `FILE:`, `Path:`, `Filename:`, `Create the following file:` and friends.
static LABEL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[a-z][a-z0-9 _-]{1,40}:\s*").expect("label prefix pattern is valid")
});

/// Ordered-list markers such as `1. ` or `2) `.
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s+").expect("list marker pattern is valid"));

/// Trailing prose after the path: `app/x.tsx (updated)`, `app/x.tsx - new screen`, `x.ts: helpers`.
static TRAILING_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\s+[(\-\u{2013}\u{2014}]|:\s).*$").expect("annotation pattern is valid")
});

/// Validated, normalized relative path
///
/// Guarantees:
/// - `/`-separated, no leading or trailing separator, no empty or `.` segments
/// - no `..` segment, no angle brackets, no control characters
/// - no label prefix (`FILE:`), list marker, emoji or surrounding quotes
///
/// The only constructor is [`clean`] (also reachable through [`CanonicalPath::new`],
/// [`FromStr`] and serde deserialization).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalPath(String);

impl CanonicalPath {
    /// Clean and validate a raw path
    ///
    /// # Errors
    /// See [`clean`].
    #[inline]
    pub fn new(raw: &str) -> Result<Self, PathError> {
        clean(raw)
    }

    /// Path as `/`-separated string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments from root to leaf
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// True for files directly under the project root
    #[inline]
    #[must_use]
    pub fn is_root_level(&self) -> bool {
        !self.0.contains('/')
    }

    /// Last segment
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// File name up to its first dot (`IconSymbol.ios.tsx` → `IconSymbol`)
    ///
    /// Dotfiles keep their full name (`.gitignore`).
    #[must_use]
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.find('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    /// Extension after the last dot, lowercase comparison left to callers
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Parent directory (`None` for root-level files)
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind('/').map(|idx| &self.0[..idx])
    }

    /// First segment when the file lives in a directory
    #[must_use]
    pub fn top_level_dir(&self) -> Option<&str> {
        self.0.find('/').map(|idx| &self.0[..idx])
    }

    /// Check whether the path lives (at any depth) under `dir`
    ///
    /// `dir` is compared segment-wise: `app` contains `app/index.tsx` but not `apple.ts`.
    #[must_use]
    pub fn is_under(&self, dir: &str) -> bool {
        let dir = dir.trim_matches('/');
        if dir.is_empty() {
            return true;
        }
        self.0.len() > dir.len() && self.0.starts_with(dir) && self.0.as_bytes()[dir.len()] == b'/'
    }
}

impl Display for CanonicalPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CanonicalPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        clean(s)
    }
}

impl TryFrom<String> for CanonicalPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        clean(&value)
    }
}

impl From<CanonicalPath> for String {
    fn from(path: CanonicalPath) -> Self {
        path.0
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Why a path was rejected as unsafe
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnsafeReason {
    /// A `..` segment
    #[error("parent-directory segment")]
    ParentSegment,

    /// `<` or `>` anywhere in the candidate
    #[error("angle bracket")]
    AngleBracket,

    /// NUL or another control character
    #[error("control character")]
    ControlCharacter,
}

/// Errors produced by [`clean`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Candidate could escape the project or smuggle markup
    #[error("unsafe path '{raw}': {reason}")]
    Unsafe {
        /// Raw candidate as received
        raw: String,
        /// Rejection reason
        reason: UnsafeReason,
    },

    /// Nothing left after normalization
    #[error("path '{raw}' is empty after normalization")]
    Empty {
        /// Raw candidate as received
        raw: String,
    },
}

impl PathError {
    /// Raw candidate that failed
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Unsafe { raw, .. } | Self::Empty { raw } => raw,
        }
    }

    fn unsafe_path(raw: &str, reason: UnsafeReason) -> Self {
        Self::Unsafe {
            raw: raw.to_string(),
            reason,
        }
    }
}

/// Whether prose after the path is cut off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Annotations {
    Keep,
    Strip,
}

/// Normalize a raw path into a [`CanonicalPath`]
///
/// Pure and deterministic. Strips, repeatedly until stable:
/// list markers and leading emoji/bullets, markdown decoration (`#`, `*`, `` ` ``),
/// surrounding quotes or brackets and `word:`-style labels.
/// Then converts `\` to `/`, collapses repeated separators and drops `.` segments.
///
/// Names such as `docs/notes - draft.md` or `report (1).md` are kept whole, so
/// distinct files on disk stay distinct. Use [`clean_header`] for header lines.
///
/// # Errors
/// - [`PathError::Unsafe`] for `..` segments, angle brackets or control characters
/// - [`PathError::Empty`] when nothing remains
pub fn clean(raw: &str) -> Result<CanonicalPath, PathError> {
    normalize(raw, Annotations::Keep)
}

/// [`clean`] for a path taken from a model-written header line
///
/// Also drops a trailing annotation such as `(updated)`, `- new screen` or
/// `: fetch helpers`, unless the text after the cut itself ends in a file
/// extension (`notes - draft.md` stays whole).
///
/// # Errors
/// As [`clean`].
pub fn clean_header(raw: &str) -> Result<CanonicalPath, PathError> {
    normalize(raw, Annotations::Strip)
}

fn normalize(raw: &str, annotations: Annotations) -> Result<CanonicalPath, PathError> {
    let trimmed = raw.trim();

    if trimmed.contains(['<', '>']) {
        return Err(PathError::unsafe_path(raw, UnsafeReason::AngleBracket));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(PathError::unsafe_path(raw, UnsafeReason::ControlCharacter));
    }

    let stripped = strip_decorations(trimmed, annotations).replace('\\', "/");

    let mut segments = Vec::new();
    for segment in stripped.split('/').map(str::trim) {
        match segment {
            "" | "." => {}
            ".." => return Err(PathError::unsafe_path(raw, UnsafeReason::ParentSegment)),
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(PathError::Empty {
            raw: raw.to_string(),
        });
    }

    Ok(CanonicalPath(segments.join("/")))
}

fn strip_decorations(input: &str, annotations: Annotations) -> &str {
    let mut current = input;
    loop {
        let next = strip_once(current, annotations);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(s: &str, annotations: Annotations) -> &str {
    let s = s.trim();

    if let Some(m) = LIST_MARKER.find(s) {
        return &s[m.end()..];
    }
    if let Some(rest) = strip_leading_marker(s) {
        return rest;
    }
    if let Some(m) = LABEL_PREFIX.find(s) {
        return &s[m.end()..];
    }
    if let Some(inner) = strip_enclosing(s) {
        return inner;
    }
    if annotations == Annotations::Strip {
        if let Some(cut) = annotation_cut(s) {
            return &s[..cut];
        }
    }
    s.trim_end_matches(is_trailing_decoration)
}

/// Where a trailing annotation starts
///
/// Prefers the first cut that leaves a name with an extension. Otherwise the
/// first cut whose tail does not itself end in an extension.
fn annotation_cut(s: &str) -> Option<usize> {
    let mut cuts = Vec::new();
    let mut from = 0;
    while let Some(m) = TRAILING_ANNOTATION.find_at(s, from) {
        if m.start() > 0 {
            cuts.push(m.start());
        }
        let step = s[m.start()..].chars().next().map_or(1, char::len_utf8);
        from = m.start() + step;
    }
    cuts.iter()
        .copied()
        .find(|&cut| ends_in_extension(&s[..cut]))
        .or_else(|| cuts.first().copied().filter(|&cut| !ends_in_extension(&s[cut..])))
}

/// `.md` in ` - draft.md`, not the `)` of ` (see x.md)`
fn ends_in_extension(s: &str) -> bool {
    s.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.ends_with(char::is_whitespace)
            && (1..=10).contains(&ext.len())
            && ext.starts_with(|c: char| c.is_ascii_alphabetic())
            && ext.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

fn strip_leading_marker(s: &str) -> Option<&str> {
    let mut chars = s.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    match first {
        '#' | '*' | '`' | '"' | '\'' | '=' | '|' => Some(rest),
        '-' if rest.starts_with([' ', '-']) => Some(rest),
        c if !c.is_ascii() && !c.is_alphanumeric() => Some(rest),
        _ => None,
    }
}

fn strip_enclosing(s: &str) -> Option<&str> {
    const PAIRS: [(char, char); 3] = [('[', ']'), ('(', ')'), ('{', '}')];
    PAIRS.iter().find_map(|&(open, close)| {
        s.strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
            .filter(|inner| !inner.contains([open, close]))
    })
}

fn is_trailing_decoration(c: char) -> bool {
    matches!(c, '*' | '`' | '"' | '\'' | ':' | ',' | ';' | '=' | '|')
        || c.is_whitespace()
        || (!c.is_ascii() && !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(raw: &str) -> String {
        clean(raw).unwrap().to_string()
    }

    #[test]
    fn plain_relative_path_is_unchanged() {
        assert_eq!(ok("app/(tabs)/index.tsx"), "app/(tabs)/index.tsx");
    }

    #[test]
    fn strips_label_prefixes_case_insensitively() {
        assert_eq!(ok("FILE: app/index.tsx"), "app/index.tsx");
        assert_eq!(ok("file: app/index.tsx"), "app/index.tsx");
        assert_eq!(ok("Path: components/Badge.tsx"), "components/Badge.tsx");
        assert_eq!(ok("Filename: hooks/useTimer.ts"), "hooks/useTimer.ts");
        assert_eq!(ok("FILE: File: app/x.tsx"), "app/x.tsx");
    }

    #[test]
    fn strips_emoji_and_markdown_decoration() {
        assert_eq!(ok("📄 app/index.tsx"), "app/index.tsx");
        assert_eq!(ok("✅ **components/Card.tsx**"), "components/Card.tsx");
        assert_eq!(ok("### `constants/Colors.ts`"), "constants/Colors.ts");
        assert_eq!(ok("- lib/api.ts"), "lib/api.ts");
        assert_eq!(ok("2. utils/format.ts"), "utils/format.ts");
    }

    #[test]
    fn strips_surrounding_quotes() {
        assert_eq!(ok("\"app/index.tsx\""), "app/index.tsx");
        assert_eq!(ok("'app/index.tsx'"), "app/index.tsx");
    }

    fn header(raw: &str) -> String {
        clean_header(raw).unwrap().to_string()
    }

    #[test]
    fn header_lines_lose_trailing_annotations() {
        assert_eq!(header("app/index.tsx (updated)"), "app/index.tsx");
        assert_eq!(header("app/settings.tsx - new screen"), "app/settings.tsx");
        assert_eq!(header("lib/api.ts: fetch helpers"), "lib/api.ts");
        assert_eq!(header("app/index.tsx:"), "app/index.tsx");
        assert_eq!(header("FILE: lib/a.ts (see also lib/b.ts)"), "lib/a.ts");
    }

    #[test]
    fn header_annotations_ending_in_an_extension_are_part_of_the_name() {
        assert_eq!(header("docs/notes - draft.md"), "docs/notes - draft.md");
        assert_eq!(header("assets/report (1).pdf"), "assets/report (1).pdf");
        assert_eq!(header("docs/notes - draft.md (updated)"), "docs/notes - draft.md");
    }

    #[test]
    fn plain_names_keep_dashes_and_parentheses() {
        assert_eq!(ok("docs/notes - draft.md"), "docs/notes - draft.md");
        assert_eq!(ok("docs/notes - final.md"), "docs/notes - final.md");
        assert_eq!(ok("assets/report (1).md"), "assets/report (1).md");
        assert_eq!(ok("notes - todo"), "notes - todo");
        assert_eq!(ok("app/index.tsx:"), "app/index.tsx");
    }

    #[test]
    fn keeps_dynamic_route_brackets() {
        assert_eq!(ok("app/user/[id].tsx"), "app/user/[id].tsx");
        assert_eq!(ok("[app/user/[id].tsx]"), "[app/user/[id].tsx]");
        assert_eq!(ok("[components/Card.tsx]"), "components/Card.tsx");
    }

    #[test]
    fn collapses_separators() {
        assert_eq!(ok("/app//(tabs)///index.tsx/"), "app/(tabs)/index.tsx");
        assert_eq!(ok("./app/./index.tsx"), "app/index.tsx");
        assert_eq!(ok("app\\components\\Card.tsx"), "app/components/Card.tsx");
    }

    #[test]
    fn rejects_parent_segments() {
        let err = clean("../../etc/passwd").unwrap_err();
        assert!(matches!(
            err,
            PathError::Unsafe {
                reason: UnsafeReason::ParentSegment,
                ..
            }
        ));
        assert!(matches!(clean("app/../../x.ts"), Err(PathError::Unsafe { .. })));
        assert!(matches!(clean("FILE: app/ .. /x.ts"), Err(PathError::Unsafe { .. })));
    }

    #[test]
    fn rejects_angle_brackets() {
        let err = clean("<script>").unwrap_err();
        assert!(matches!(
            err,
            PathError::Unsafe {
                reason: UnsafeReason::AngleBracket,
                ..
            }
        ));
        assert!(matches!(clean("app/<Home>.tsx"), Err(PathError::Unsafe { .. })));
    }

    #[test]
    fn rejects_control_characters() {
        assert!(matches!(
            clean("app/\0index.tsx"),
            Err(PathError::Unsafe {
                reason: UnsafeReason::ControlCharacter,
                ..
            })
        ));
    }

    #[test]
    fn rejects_empty_paths() {
        assert!(matches!(clean("  "), Err(PathError::Empty { .. })));
        assert!(matches!(clean(""), Err(PathError::Empty { .. })));
        assert!(matches!(clean("FILE:"), Err(PathError::Empty { .. })));
        assert!(matches!(clean("///"), Err(PathError::Empty { .. })));
    }

    #[test]
    fn error_keeps_raw_input() {
        let err = clean("../x").unwrap_err();
        assert_eq!(err.raw(), "../x");
        assert!(err.to_string().contains("parent-directory"));
    }

    #[test]
    fn accessors() {
        let path = clean("components/ui/IconSymbol.ios.tsx").unwrap();
        assert_eq!(path.file_name(), "IconSymbol.ios.tsx");
        assert_eq!(path.stem(), "IconSymbol");
        assert_eq!(path.extension(), Some("tsx"));
        assert_eq!(path.parent(), Some("components/ui"));
        assert_eq!(path.top_level_dir(), Some("components"));
        assert_eq!(path.depth(), 3);
        assert!(!path.is_root_level());
        assert!(path.is_under("components"));
        assert!(path.is_under("components/ui/"));
        assert!(!path.is_under("comp"));
    }

    #[test]
    fn dotfile_accessors() {
        let path = clean(".gitignore").unwrap();
        assert_eq!(path.stem(), ".gitignore");
        assert_eq!(path.extension(), None);
        assert!(path.is_root_level());
        assert_eq!(path.parent(), None);
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let path: CanonicalPath = serde_json::from_str("\"FILE: app/index.tsx\"").unwrap();
        assert_eq!(path.as_str(), "app/index.tsx");
        assert!(serde_json::from_str::<CanonicalPath>("\"../x\"").is_err());
    }

    #[test]
    fn clean_is_deterministic() {
        for raw in ["FILE: app/x.tsx", "../y", "  ", "📄 `lib/a.ts`", "x.ts (new)"] {
            assert_eq!(clean(raw), clean(raw));
            assert_eq!(clean_header(raw), clean_header(raw));
        }
    }
}
