//! Embedding-surface tests: the `exec` contract end to end.

#![allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use dpl::{exec, exec_opts, exec_with, BufferHost, ExecOptions};

#[test]
fn factorial_scenario() {
    let mut host = BufferHost::new();
    exec(
        "f := (n) -> { if n <= 1 { return 1; }; return n * f(n - 1); }; println(f(5));",
        &mut host,
    )
    .unwrap();
    assert_eq!(host.output(), "120");
}

#[test]
fn range_sum_scenario() {
    let mut host = BufferHost::new();
    exec("sum := 0; for i in 5 { sum = sum + i; }; println(sum);", &mut host).unwrap();
    assert_eq!(host.output(), "10");
}

#[test]
fn persistent_append_scenario() {
    let mut host = BufferHost::new();
    exec("a := []; b := append(a, 1); println(a); println(b);", &mut host).unwrap();
    assert_eq!(host.chunks(), ["[]", "[1]"]);
}

#[test]
fn undefined_variable_diagnostic_names_the_identifier() {
    let mut host = BufferHost::new();
    exec("println(x);", &mut host).unwrap_err();
    assert_eq!(host.chunks().len(), 1);
    assert_eq!(host.chunks()[0], "runtime error: undefined variable `x` at 8..9");
}

#[test]
fn failure_produces_no_partial_output_before_the_diagnostic() {
    let mut host = BufferHost::new();
    exec("println(1); println(2); nope();", &mut host).unwrap_err();
    let chunks = host.chunks();
    assert_eq!(&chunks[..2], ["1", "2"]);
    assert!(chunks[2].starts_with("runtime error: undefined variable `nope`"));
    assert_eq!(chunks.len(), 3);
}

#[test]
fn lex_error_diagnostic() {
    let mut host = BufferHost::new();
    exec("x := 1 $ 2;", &mut host).unwrap_err();
    assert_eq!(host.chunks(), ["lex error: unexpected character `$` at 7..8"]);
}

#[test]
fn parse_error_diagnostic() {
    let mut host = BufferHost::new();
    exec("if x 1; };", &mut host).unwrap_err();
    assert_eq!(host.chunks().len(), 1);
    assert!(host.chunks()[0].starts_with("parse error: expected `{`, found number 1"));
}

#[test]
fn timeout_diagnostic_mentions_the_budget() {
    let mut host = BufferHost::new();
    let options = ExecOptions {
        step_budget: 1_000,
        ..ExecOptions::default()
    };
    exec_opts("for i in 100000000 { i; };", &mut host, options).unwrap_err();
    assert_eq!(host.chunks().len(), 1);
    assert!(host.chunks()[0]
        .starts_with("runtime error: execution budget of 1000 steps exhausted"));
}

#[test]
fn exec_with_closures() {
    let mut chunks = Vec::new();
    let mut draws = Vec::new();
    exec_with(
        "println(\"hi\"); draw(\"bar\", [], {\"title\": \"t\"});",
        |chunk| chunks.push(chunk.to_owned()),
        |command| draws.push(command),
    )
    .unwrap();
    assert_eq!(chunks, ["hi"]);
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].chart, "bar");
}

#[test]
fn draw_commands_convert_to_json() {
    let mut host = BufferHost::new();
    exec(
        "draw(\"line\", [{\"m\": \"jan\", \"v\": 3}], {\"idField\": \"m\", \"valueFields\": [\"v\"], \"title\": \"T\"});",
        &mut host,
    )
    .unwrap();

    let json = dpl::draw_to_json(&host.draws()[0]);
    assert_eq!(
        json,
        serde_json::json!({
            "chart": "line",
            "rows": [{"m": "jan", "v": 3.0}],
            "options": {"idField": "m", "valueFields": ["v"], "title": "T"},
        })
    );
}

#[test]
fn runs_are_deterministic_and_isolated() {
    let source = "seen := []; for i in 3 { seen = append(seen, i); }; println(seen);";
    let mut first = BufferHost::new();
    exec(source, &mut first).unwrap();
    let mut second = BufferHost::new();
    exec(source, &mut second).unwrap();
    assert_eq!(first.output(), second.output());
    assert_eq!(first.output(), "[0,1,2]");
}

#[test]
fn result_value_is_the_last_statement() {
    let mut host = BufferHost::new();
    let value = exec("1 + 2;", &mut host).unwrap();
    assert_eq!(value.display(), "3");
}
