//! Cleanup of header and fence residue around extracted bodies

use crate::text::{fence_info, is_end_marker, is_fence_line, path_token};
use once_cell::sync::Lazy;
use regex::Regex;

/// What may surround a path on a repeated header line once the path itself is removed.
static HEADER_RESIDUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[\s#*/<!=`:\[\]>"'-]*(?i:(?:file(?:[ _-]?(?:path|name))?|path)\s*:)?[\s#*/<!=`:\[\]>"'-]*$"#)
        .expect("header residue pattern is valid")
});

/// Prose lines allowed ahead of the fence that wraps a body
const MAX_PREAMBLE_LINES: usize = 3;

/// Strip residue from a block body
///
/// Drops leading blank lines, a repeated header naming `raw_path`, the wrapping
/// fence (content after its close is discarded) and trailing end markers. The
/// result is either empty or ends with exactly one newline.
pub(crate) fn trim_body(body: &str, raw_path: &str) -> String {
    let header = path_token(raw_path).unwrap_or_else(|| raw_path.trim());
    let all: Vec<&str> = body.lines().collect();

    let mut lines = skip_blank(&all);
    lines = skip_repeated_header(lines, header);

    if let Some(fence_at) = wrapping_fence(lines) {
        lines = unwrap_fence(&lines[fence_at..]);
        lines = skip_repeated_header(skip_blank(lines), header);
    }

    lines = trim_trailing_markers(lines);
    finish(lines)
}

fn skip_blank<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    let start = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(lines.len());
    &lines[start..]
}

fn skip_repeated_header<'a>(lines: &'a [&'a str], header: &str) -> &'a [&'a str] {
    match lines.first() {
        Some(first) if names_path(first, header) => skip_blank(&lines[1..]),
        _ => lines,
    }
}

fn names_path(line: &str, header: &str) -> bool {
    let Some(token) = path_token(line) else {
        return false;
    };
    let normalized = |s: &str| s.trim_start_matches("./").trim_start_matches('/').to_string();
    if normalized(token) != normalized(header) {
        return false;
    }
    let rest = line.replacen(token, "", 1);
    HEADER_RESIDUE.is_match(&rest)
}

/// Index of the fence that wraps the body, if any
///
/// The first line may be the fence itself, or a few prose lines may precede it.
fn wrapping_fence(lines: &[&str]) -> Option<usize> {
    let fence_at = lines.iter().position(|line| is_fence_line(line))?;
    if fence_at > MAX_PREAMBLE_LINES {
        return None;
    }
    lines[..fence_at]
        .iter()
        .all(|line| is_prose(line))
        .then_some(fence_at)
}

fn is_prose(line: &str) -> bool {
    let t = line.trim();
    t.is_empty()
        || !(t.ends_with([';', '{', '}', ')', ',', '(', '>'])
            || t.starts_with("import ")
            || t.starts_with("export ")
            || t.starts_with("//"))
}

fn unwrap_fence<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    let Some(opener) = lines.first() else {
        return lines;
    };
    let trimmed = opener.trim_start();
    let fence_char = trimmed.chars().next().unwrap_or('`');
    let fence_len = trimmed.chars().take_while(|&c| c == fence_char).count();

    let body = &lines[1..];
    let close = body.iter().position(|line| {
        let t = line.trim();
        t.chars().take_while(|&c| c == fence_char).count() >= fence_len
            && t.trim_start_matches(fence_char).trim().is_empty()
    });
    match close {
        Some(end) => &body[..end],
        None => body,
    }
}

fn trim_trailing_markers<'a>(mut lines: &'a [&'a str]) -> &'a [&'a str] {
    let has_opening_fence = lines
        .iter()
        .any(|line| is_fence_line(line) && !fence_info(line).is_empty());
    while let Some((last, rest)) = lines.split_last() {
        let orphan_fence = is_fence_line(last) && fence_info(last).is_empty() && !has_opening_fence
            && rest.iter().all(|line| !is_fence_line(line));
        if last.trim().is_empty() || is_end_marker(last) || orphan_fence {
            lines = rest;
        } else {
            break;
        }
    }
    lines
}

fn finish(lines: &[&str]) -> String {
    let joined = lines.join("\n");
    let trimmed = joined.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}
