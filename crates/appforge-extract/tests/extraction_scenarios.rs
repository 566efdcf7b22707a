//! End-to-end extraction over representative model responses

use appforge_extract::{ExtractorConfig, ResponseExtractor, SkipReason};
use appforge_files::{FileKind, FileSet};
use appforge_test_utils::responses;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn paths(blob: &str) -> Vec<String> {
    ResponseExtractor::new()
        .extract(blob)
        .iter()
        .map(|r| r.path().to_string())
        .collect()
}

#[test]
fn file_markers_wrapping_fences() {
    let extraction = ResponseExtractor::new().extract_with_audit(responses::FILE_MARKERS);
    assert_eq!(extraction.audit.strategy, Some("marker_blocks"));
    assert_eq!(extraction.audit.variant, Some("file_marker"));

    let set = FileSet::from(extraction);
    assert_eq!(set.len(), 3);
    let habit_list = set.get("components/HabitList.tsx").unwrap();
    assert_eq!(
        habit_list.content(),
        "import { ThemedView } from '@/components/ThemedView';\n\nexport function HabitList() {\n  return <ThemedView />;\n}\n"
    );
    assert_eq!(set.get("package.json").unwrap().kind(), FileKind::Manifest);
    assert!(!set.content("package.json").unwrap().contains("Let me know"));
}

#[test]
fn typed_file_fields_do_not_split_a_marker_block() {
    let blob = "FILE: components/Viewer.tsx\ninterface Props {\n  filePath: string;\n}\nexport function Viewer(p: Props) { return null; }\nEND FILE\n";
    let set = FileSet::from(ResponseExtractor::new().extract_with_audit(blob));
    assert_eq!(set.len(), 1);
    assert_eq!(
        set.content("components/Viewer.tsx").unwrap(),
        "interface Props {\n  filePath: string;\n}\nexport function Viewer(p: Props) { return null; }\n"
    );
}

#[test]
fn each_header_variant() {
    assert_eq!(
        paths(responses::BRACKETED),
        vec!["app/(tabs)/settings.tsx", "constants/Strings.ts"]
    );
    assert_eq!(
        paths(responses::FENCE_INFO),
        vec!["app/(tabs)/stats.tsx", "hooks/useHabits.ts"]
    );
    assert_eq!(
        paths(responses::HEADINGS),
        vec!["app/(tabs)/profile.tsx", "components/Avatar.tsx"]
    );
    assert_eq!(
        paths(responses::COMMENT_HEADERS),
        vec!["app/(tabs)/timer.tsx", "hooks/useTimer.ts"]
    );
}

#[test]
fn comment_header_line_is_not_part_of_content() {
    let records = ResponseExtractor::new().extract(responses::COMMENT_HEADERS);
    assert!(records[1].content().starts_with("export function useTimer()"));
}

#[test]
fn duplicate_paths_keep_the_last_body() {
    let extraction = ResponseExtractor::new().extract_with_audit(responses::DUPLICATE_PATHS);
    let index: Vec<_> = extraction
        .records
        .iter()
        .filter(|r| r.path().as_str() == "app/(tabs)/index.tsx")
        .collect();
    assert_eq!(index.len(), 1);
    assert!(index[0].content().contains("'v2'"));
    assert_eq!(extraction.audit.duplicates.len(), 1);
    assert_eq!(extraction.records.len(), 2);
}

#[test]
fn unsafe_paths_are_skipped_not_fatal() {
    let extraction = ResponseExtractor::new().extract_with_audit(responses::UNSAFE_PATHS);
    let kept: Vec<_> = extraction.records.iter().map(|r| r.path().as_str()).collect();
    assert_eq!(kept, vec!["app/safe.tsx"]);
    assert_eq!(extraction.audit.skipped.len(), 2);
    assert!(extraction
        .audit
        .skipped
        .iter()
        .all(|s| matches!(s.reason, SkipReason::InvalidPath(_))));
}

#[test]
fn declarations_without_headers() {
    let extraction = ResponseExtractor::new().extract_with_audit(responses::DECLARATIONS);
    assert_eq!(extraction.audit.strategy, Some("declarations"));
    let paths: Vec<_> = extraction.records.iter().map(|r| r.path().as_str()).collect();
    assert_eq!(paths, vec!["app/(tabs)/index.tsx", "components/StreakBadge.tsx"]);
    assert!(extraction.records[1]
        .content()
        .starts_with("import React from 'react';"));
}

#[test]
fn bare_fences_named_by_sniffing() {
    let extraction = ResponseExtractor::new().extract_with_audit(responses::BARE_FENCES);
    assert_eq!(extraction.audit.strategy, Some("bare_fences"));
    let paths: Vec<_> = extraction.records.iter().map(|r| r.path().as_str()).collect();
    assert_eq!(paths, vec!["package.json", "generated/snippet-2.ts"]);
}

#[test]
fn manifest_in_prose_is_sniffed() {
    let extraction = ResponseExtractor::new().extract_with_audit(responses::RAW_MANIFEST);
    assert_eq!(extraction.audit.strategy, Some("content_sniff"));
    assert_eq!(extraction.records.len(), 1);
    assert_eq!(extraction.records[0].path().as_str(), "package.json");
    assert_eq!(
        extraction.records[0].content(),
        "{\"dependencies\": {\"x\": \"1.0.0\"}}\n"
    );
}

#[test]
fn refusal_yields_nothing() {
    assert!(ResponseExtractor::new().extract(responses::REFUSAL).is_empty());
    assert!(ResponseExtractor::new().extract("").is_empty());
}

#[test]
fn synthesized_paths_follow_config() {
    let extractor = ResponseExtractor::with_config(
        ExtractorConfig::default()
            .with_screens_dir("src/screens")
            .with_components_dir("src/components"),
    );
    let paths: Vec<_> = extractor
        .extract(responses::DECLARATIONS)
        .iter()
        .map(|r| r.path().to_string())
        .collect();
    assert_eq!(paths, vec!["src/screens/index.tsx", "src/components/StreakBadge.tsx"]);
}

fn marker_files() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec(
        (
            "[a-z]{1,8}",
            prop::collection::vec("[a-z][a-z0-9 ;(){}]{0,30}", 1..6),
        ),
        1..5,
    )
    .prop_map(|files| {
        files
            .into_iter()
            .enumerate()
            .map(|(i, (name, lines))| (format!("dir{i}/{name}.ts"), lines))
            .collect()
    })
}

proptest! {
    #[test]
    fn well_formed_marker_blocks_round_trip(files in marker_files()) {
        let mut blob = String::from("Here are the files.\n\n");
        for (path, lines) in &files {
            blob.push_str(&format!("FILE: {path}\n{}\nEND FILE\n\n", lines.join("\n")));
        }

        let records = ResponseExtractor::new().extract(&blob);
        prop_assert_eq!(records.len(), files.len());
        for (record, (path, lines)) in records.iter().zip(&files) {
            prop_assert_eq!(record.path().as_str(), path.as_str());
            let expected = format!("{}\n", lines.join("\n").trim_end());
            prop_assert_eq!(record.content(), expected.as_str());
        }
    }
}
