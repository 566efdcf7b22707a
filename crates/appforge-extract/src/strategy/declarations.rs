//! Heuristic declaration extraction
//!
//! Finds top-level `function Name` / `const Name =` definitions whose name is
//! a capitalized identifier and turns each span into one file.

use super::{ExtractionStrategy, StrategyOutput};
use crate::audit::RawCandidate;
use crate::config::ExtractorConfig;
use crate::text::is_fence_line;
use once_cell::sync::Lazy;
use regex::Regex;

/// Column-0 UI declaration, optionally exported.
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(?:export\s+(?:default\s+)?)?(?:async\s+)?(?:function\s+(?P<func>[A-Z][A-Za-z0-9_]*)\s*[(<]|const\s+(?P<cons>[A-Z][A-Za-z0-9_]*)\s*(?::[^=\n]+)?=)",
    )
    .expect("declaration pattern is valid")
});

/// Import statements, including multi-line named imports.
static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^import\s[^;]*?['"][^'"\n]+['"];?"#).expect("import pattern is valid")
});

/// Closing tag or self-closing element.
static JSX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</[A-Za-z][\w.]*>|/>").expect("jsx pattern is valid"));

/// Named UI declaration found in a blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration<'a> {
    pub(crate) name: &'a str,
    pub(crate) start: usize,
}

/// All capitalized, non-constant declarations in document order
pub(crate) fn declarations(source: &str) -> Vec<Declaration<'_>> {
    DECLARATION
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.name("func").or_else(|| caps.name("cons"))?.as_str();
            // SCREAMING_CASE constants are data, not UI units
            name.chars().any(char::is_lowercase).then_some(Declaration {
                name,
                start: whole.start(),
            })
        })
        .collect()
}

/// True when the code renders elements
pub(crate) fn contains_jsx(code: &str) -> bool {
    JSX.is_match(code)
}

/// Synthesized path for a UI unit named `name`
///
/// `*Screen` names go to the screens directory (`HomeScreen` → `index.tsx`,
/// `UserProfileScreen` → `user-profile.tsx`); everything else is a component,
/// `.tsx` when it renders elements and `.ts` otherwise.
pub(crate) fn path_for_declaration(name: &str, code: &str, config: &ExtractorConfig) -> String {
    if let Some(base) = name.strip_suffix("Screen") {
        let stem = match base {
            "" | "Home" | "Index" | "Main" => "index".to_string(),
            other => to_kebab_case(other),
        };
        return config.screen_path(&stem);
    }
    let ext = if contains_jsx(code) { "tsx" } else { "ts" };
    config.component_path(name, ext)
}

fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Import preamble that precedes the first declaration
fn import_preamble(source: &str, first_declaration: usize) -> String {
    IMPORT
        .find_iter(&source[..first_declaration])
        .map(|m| m.as_str().trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate a span at its first fence line
fn until_fence(span: &str) -> &str {
    let mut offset = 0;
    for line in span.split_inclusive('\n') {
        if is_fence_line(line) {
            return &span[..offset];
        }
        offset += line.len();
    }
    span
}

/// Cascade step 2: one file per top-level UI declaration
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationStrategy;

impl ExtractionStrategy for DeclarationStrategy {
    fn name(&self) -> &'static str {
        "declarations"
    }

    fn extract(&self, blob: &str, config: &ExtractorConfig) -> Option<StrategyOutput> {
        let found = declarations(blob);
        let first = found.first()?;
        let preamble = import_preamble(blob, first.start);

        let candidates = found
            .iter()
            .enumerate()
            .map(|(i, decl)| {
                let end = found.get(i + 1).map_or(blob.len(), |next| next.start);
                let span = until_fence(&blob[decl.start..end]).trim_end();
                let content = if preamble.is_empty() {
                    format!("{span}\n")
                } else {
                    format!("{preamble}\n\n{span}\n")
                };
                RawCandidate::new(path_for_declaration(decl.name, span, config), content)
            })
            .collect();

        StrategyOutput::new(candidates).non_empty()
    }
}
