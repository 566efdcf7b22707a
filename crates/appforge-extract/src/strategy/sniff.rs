//! Content sniffing
//!
//! Recognizes whole-document shapes when no structure around them survived:
//! dependency manifests, Expo app configs, TypeScript configs and a bare
//! block of module code.

use super::declarations::contains_jsx;
use super::{ExtractionStrategy, StrategyOutput};
use crate::audit::RawCandidate;
use crate::config::ExtractorConfig;
use serde_json::Value;

/// Root-level file a JSON object most likely is
pub(crate) fn classify_json(value: &Value) -> Option<&'static str> {
    let object = value.as_object()?;
    let has = |key: &str| object.contains_key(key);

    if has("dependencies") || has("devDependencies") || has("scripts") || (has("name") && has("version")) {
        Some("package.json")
    } else if has("expo") {
        Some("app.json")
    } else if has("compilerOptions") {
        Some("tsconfig.json")
    } else {
        None
    }
}

/// Every top-level JSON object in `blob` with its byte range
fn json_objects(blob: &str) -> Vec<(usize, usize, Value)> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = blob[cursor..].find('{') {
        let start = cursor + rel;
        let mut stream = serde_json::Deserializer::from_str(&blob[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                let end = start + stream.byte_offset();
                found.push((start, end, value));
                cursor = end;
            }
            _ => cursor = start + 1,
        }
    }

    found
}

/// Start of the first column-0 `import`/`export` line
fn module_start(blob: &str) -> Option<usize> {
    let mut offset = 0;
    for line in blob.split_inclusive('\n') {
        if line.starts_with("import ") || line.starts_with("export ") {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Module block from `start` to the last line that reads like code
fn module_block(blob: &str, start: usize) -> &str {
    let rest = &blob[start..];
    let mut end = 0;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        let t = line.trim();
        if t.ends_with([';', '}', ')', '>', ']']) || t.starts_with("export ") || t.starts_with("import ") {
            end = offset;
        }
    }
    rest[..end].trim_end()
}

/// Cascade step 4: whole-document shapes in the raw blob
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSniffStrategy;

impl ExtractionStrategy for ContentSniffStrategy {
    fn name(&self) -> &'static str {
        "content_sniff"
    }

    fn extract(&self, blob: &str, config: &ExtractorConfig) -> Option<StrategyOutput> {
        let mut candidates = Vec::new();

        let objects = json_objects(blob);
        for (start, end, value) in &objects {
            if let Some(path) = classify_json(value) {
                candidates.push(RawCandidate::new(path, format!("{}\n", blob[*start..*end].trim())));
            }
        }

        if let Some(start) = module_start(blob) {
            let inside_json = objects.iter().any(|(s, e, _)| (*s..*e).contains(&start));
            let code = module_block(blob, start);
            if !inside_json && !code.is_empty() {
                let ext = if contains_jsx(code) { "tsx" } else { "ts" };
                candidates.push(RawCandidate::new(
                    config.fallback_path(&format!("module.{ext}")),
                    format!("{code}\n"),
                ));
            }
        }

        StrategyOutput::new(candidates).non_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_known_documents() {
        assert_eq!(classify_json(&json!({"dependencies": {}})), Some("package.json"));
        assert_eq!(classify_json(&json!({"name": "a", "version": "1.0.0"})), Some("package.json"));
        assert_eq!(classify_json(&json!({"expo": {"name": "a"}})), Some("app.json"));
        assert_eq!(classify_json(&json!({"compilerOptions": {}})), Some("tsconfig.json"));
        assert_eq!(classify_json(&json!({"name": "a"})), None);
        assert_eq!(classify_json(&json!([1, 2])), None);
    }

    #[test]
    fn finds_json_objects_inside_prose() {
        let blob = r#"Update your manifest to {"dependencies": {"x": "1.0.0"}} and the config {"expo": {}}. Not json: {oops}."#;
        let objects = json_objects(blob);
        assert_eq!(objects.len(), 2);
        assert_eq!(&blob[objects[0].0..objects[0].1], r#"{"dependencies": {"x": "1.0.0"}}"#);
    }

    #[test]
    fn emits_manifest_and_module() {
        let blob = "Sure!\n{\n  \"dependencies\": {\"x\": \"1.0.0\"}\n}\n\nimport { useState } from 'react';\nexport function useCounter() {\n  return useState(0);\n}\n\nHope this helps.\n";
        let output = ContentSniffStrategy
            .extract(blob, &ExtractorConfig::default())
            .unwrap();
        let paths: Vec<_> = output.candidates.iter().map(|c| c.raw_path.as_str()).collect();
        assert_eq!(paths, vec!["package.json", "generated/module.ts"]);
        assert!(output.candidates[1].content.ends_with("}\n"));
        assert!(!output.candidates[1].content.contains("Hope"));
    }

    #[test]
    fn unknown_json_is_ignored() {
        assert!(ContentSniffStrategy
            .extract(r#"{"hello": "world"}"#, &ExtractorConfig::default())
            .is_none());
    }
}
