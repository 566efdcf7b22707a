use appforge_cli::tree::{read_tree, write_tree};
use appforge_cli::{command, execute, invocation, run_merge, MergeOptions};
use appforge_test_utils::{expo_baseline, responses};
use pretty_assertions::assert_eq;
use std::fs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

fn write_response(dir: &Path, name: &str, blob: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, blob).unwrap();
    path
}

#[tokio::test]
async fn merge_writes_the_combined_tree() {
    let work = tempfile::tempdir().unwrap();
    let baseline = work.path().join("baseline");
    let out = work.path().join("out");
    write_tree(&baseline, &expo_baseline()).unwrap();
    let first = write_response(work.path(), "first.md", responses::FILE_MARKERS);
    let second = write_response(work.path(), "second.md", responses::STRUCTURAL_OVERWRITE);

    let output = run_merge(&MergeOptions {
        baseline: baseline.clone(),
        responses: vec![first, second],
        config: None,
        out: Some(out.clone()),
    })
    .await
    .unwrap();

    assert_eq!(output.responses.len(), 2);
    assert_eq!(output.responses[1].report.kept.len(), 3);

    let written = read_tree(&out).unwrap();
    assert_eq!(written.len(), expo_baseline().len() + 2);
    assert_eq!(output.written, Some(written.len()));
    assert!(written.contains("components/HabitList.tsx"));
    assert!(written.contains("hooks/useTimer.ts"));
    assert_eq!(
        written.content("app/_layout.tsx"),
        expo_baseline().content("app/_layout.tsx")
    );
}

#[tokio::test]
async fn merge_json_output_through_the_command_line() {
    let work = tempfile::tempdir().unwrap();
    let baseline = work.path().join("baseline");
    fs::create_dir_all(baseline.join("screens")).unwrap();
    fs::write(baseline.join("config.json"), "{}").unwrap();
    fs::write(baseline.join("screens/home.tsx"), "old").unwrap();
    let response = write_response(work.path(), "reply.md", responses::BASIC_SCENARIO);

    let matches = command()
        .try_get_matches_from([
            OsString::from("appforge"),
            "merge".into(),
            "--baseline".into(),
            baseline.into_os_string(),
            "--response".into(),
            response.into_os_string(),
            "--json".into(),
        ])
        .unwrap();
    let (invocation, _) = invocation(&matches).unwrap();
    let printed = execute(&invocation).await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&printed).unwrap();
    assert_eq!(json["files"]["config.json"], "{}");
    assert_eq!(json["responses"][0]["report"]["added"][0], "components/Badge.tsx");
    assert_eq!(json["responses"][0]["audit"]["strategy"], "marker_blocks");
}

#[tokio::test]
async fn missing_baseline_is_an_error_with_context() {
    let work = tempfile::tempdir().unwrap();
    let response = write_response(work.path(), "reply.md", responses::BASIC_SCENARIO);

    let err = run_merge(&MergeOptions {
        baseline: work.path().join("missing"),
        responses: vec![response],
        config: None,
        out: None,
    })
    .await
    .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("loading baseline"), "{message}");
    assert!(message.contains("is not a directory"), "{message}");
}

#[tokio::test]
async fn extract_lists_records() {
    let work = tempfile::tempdir().unwrap();
    let response = write_response(work.path(), "reply.md", responses::BARE_FENCES);

    let matches = command()
        .try_get_matches_from([OsString::from("appforge"), "extract".into(), response.into_os_string()])
        .unwrap();
    let (invocation, _) = invocation(&matches).unwrap();
    let printed = execute(&invocation).await.unwrap();

    assert!(printed.starts_with("strategy: bare_fences\n"));
    assert!(printed.contains("package.json [manifest]"));
}
