//! Field-level merge of JSON dependency manifests

use crate::error::{ManifestMergeError, ManifestSide};
use serde_json::{Map, Value};
use tracing::warn;

fn parse_object(text: &str, side: ManifestSide) -> Result<Map<String, Value>, ManifestMergeError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ManifestMergeError::NotAnObject { side }),
        Err(source) => Err(ManifestMergeError::InvalidJson { side, source }),
    }
}

/// Merge an incoming manifest into the existing one
///
/// Sections named in `union_sections` are unioned entry by entry, with the
/// incoming value winning on a key collision. Any other top-level key keeps
/// the existing value; keys only present in the incoming document are added.
/// Key order follows the existing document, new keys appended.
///
/// # Errors
/// Either side failing to parse as a JSON object.
pub fn merge_manifest<S: AsRef<str>>(
    existing: &str,
    incoming: &str,
    union_sections: &[S],
) -> Result<String, ManifestMergeError> {
    let mut merged = parse_object(existing, ManifestSide::Baseline)?;
    let incoming = parse_object(incoming, ManifestSide::Incoming)?;

    for (key, value) in incoming {
        let is_union = union_sections.iter().any(|s| s.as_ref() == key);
        if !is_union {
            merged.entry(key).or_insert(value);
            continue;
        }

        let Value::Object(entries) = value else {
            warn!(section = %key, "ignoring non-object manifest section in incoming file");
            continue;
        };

        match merged.get_mut(&key) {
            Some(Value::Object(existing_entries)) => {
                for (name, version) in entries {
                    existing_entries.insert(name, version);
                }
            }
            _ => {
                merged.insert(key, Value::Object(entries));
            }
        }
    }

    let mut rendered = serde_json::to_string_pretty(&Value::Object(merged)).map_err(ManifestMergeError::Render)?;
    rendered.push('\n');
    Ok(rendered)
}
