// pass_persist protocol session tests over in-memory streams

mod common;

use cadvisor_snmp_agent::cache::SnapshotCache;
use cadvisor_snmp_agent::cadvisor_repo::{ContainerMap, ContainerSource, stable_seed};
use cadvisor_snmp_agent::errors::FetchError;
use cadvisor_snmp_agent::protocol;
use std::time::Duration;

const ROOT: &str = "1.3.6.1.4.1.424242.2.1";

struct StaticSource(ContainerMap);

impl ContainerSource for StaticSource {
    async fn fetch(&self) -> Result<ContainerMap, FetchError> {
        Ok(self.0.clone())
    }
}

struct FailingSource;

impl ContainerSource for FailingSource {
    async fn fetch(&self) -> Result<ContainerMap, FetchError> {
        Err(FetchError::MalformedResponse("boom".to_string()))
    }
}

async fn run_session<S: ContainerSource>(source: S, input: &str) -> Vec<String> {
    let cache = SnapshotCache::new(source, Duration::from_secs(60));
    let mut output = Vec::new();
    protocol::run(&cache, input.as_bytes(), &mut output)
        .await
        .expect("session");
    String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(str::to_string)
        .collect()
}

fn one_container() -> StaticSource {
    StaticSource(common::container_map(&[(
        "aaa",
        common::running_container("web", 10, 100),
    )]))
}

#[tokio::test]
async fn ping_pong() {
    assert_eq!(run_session(one_container(), "PING\n").await, vec!["PONG"]);
}

#[tokio::test]
async fn unknown_verb_answers_none() {
    assert_eq!(run_session(one_container(), "frobnicate\n").await, vec!["NONE"]);
}

#[tokio::test]
async fn blank_lines_are_ignored() {
    assert_eq!(
        run_session(one_container(), "\n\nPING\n").await,
        vec!["PONG"]
    );
}

#[tokio::test]
async fn eof_terminates_cleanly() {
    assert!(run_session(one_container(), "").await.is_empty());
}

#[tokio::test]
async fn get_known_oid_returns_typed_triple() {
    let index = stable_seed("web");
    let input = format!("get {ROOT}.{index}.1\nget .{ROOT}.{index}.2\n");
    let lines = run_session(one_container(), &input).await;
    assert_eq!(
        lines,
        vec![
            format!("{ROOT}.{index}.1"),
            "string".to_string(),
            "web".to_string(),
            format!("{ROOT}.{index}.2"),
            "integer".to_string(),
            "1".to_string(),
        ]
    );
}

#[tokio::test]
async fn get_absent_or_malformed_oid_answers_none() {
    let lines = run_session(
        one_container(),
        &format!("get {ROOT}.9999.1\nget not.an.oid\n"),
    )
    .await;
    assert_eq!(lines, vec!["NONE", "NONE"]);
}

#[tokio::test]
async fn getnext_from_root_returns_first_entry() {
    let index = stable_seed("web");
    let lines = run_session(one_container(), &format!("getnext {ROOT}\n")).await;
    assert_eq!(
        lines,
        vec![format!("{ROOT}.{index}.1"), "string".to_string(), "web".to_string()]
    );
}

#[tokio::test]
async fn getnext_accepts_oid_on_following_line() {
    let index = stable_seed("web");
    let lines = run_session(one_container(), &format!("getnext\n{ROOT}\n")).await;
    assert_eq!(lines[0], format!("{ROOT}.{index}.1"));
}

#[tokio::test]
async fn getnext_past_last_entry_answers_end() {
    let index = stable_seed("web");
    let lines = run_session(one_container(), &format!("getnext {ROOT}.{index}.6\n")).await;
    assert_eq!(lines, vec!["END"]);
}

#[tokio::test]
async fn getnext_on_empty_table_answers_end() {
    let source = StaticSource(common::container_map(&[]));
    let lines = run_session(source, &format!("getnext {ROOT}\n")).await;
    assert_eq!(lines, vec!["END"]);
}

#[tokio::test]
async fn getbulk_inline_walks_the_whole_row_then_ends() {
    let index = stable_seed("web");
    let lines = run_session(one_container(), &format!("getbulk 0 100 {ROOT}\n")).await;
    // Six triples then END, since the table is exhausted before 100.
    assert_eq!(lines.len(), 6 * 3 + 1);
    assert_eq!(lines[0], format!("{ROOT}.{index}.1"));
    assert_eq!(lines[lines.len() - 1], "END");
}

#[tokio::test]
async fn getbulk_stops_at_max_repetitions_without_end() {
    let lines = run_session(one_container(), &format!("getbulk 0 2 {ROOT}\n")).await;
    assert_eq!(lines.len(), 2 * 3);
    assert_ne!(lines[lines.len() - 1], "END");
}

#[tokio::test]
async fn getbulk_accepts_multiline_framing() {
    let index = stable_seed("web");
    let lines = run_session(one_container(), &format!("getbulk\n0\n2\n{ROOT}\n")).await;
    assert_eq!(lines.len(), 2 * 3);
    assert_eq!(lines[0], format!("{ROOT}.{index}.1"));
}

#[tokio::test]
async fn upstream_failure_degrades_to_sentinels_not_a_crash() {
    let lines = run_session(
        FailingSource,
        &format!("PING\ngetnext {ROOT}\nget {ROOT}.1.1\nPING\n"),
    )
    .await;
    assert_eq!(lines, vec!["PONG", "END", "NONE", "PONG"]);
}
