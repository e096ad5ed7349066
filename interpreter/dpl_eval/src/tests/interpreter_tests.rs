//! End-to-end evaluation: lex + parse + run against a buffering host.

use pretty_assertions::assert_eq;

use dpl_ir::StringInterner;
use dpl_lexer::lex;
use dpl_parse::parse;

use crate::errors::{EvalError, EvalErrorKind};
use crate::host::BufferHost;
use crate::interpreter::Interpreter;
use crate::value::Value;
use crate::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_STEP_BUDGET};

fn run_with_limits(
    source: &str,
    steps: u64,
    depth: usize,
) -> (Result<Value, EvalError>, BufferHost) {
    let interner = StringInterner::new();
    let tokens = lex(source, &interner).unwrap();
    let program = parse(&tokens, &interner).unwrap();
    let mut host = BufferHost::new();
    let result = Interpreter::with_limits(&interner, &program.arena, &mut host, steps, depth)
        .run(program.root);
    (result, host)
}

fn run(source: &str) -> (Result<Value, EvalError>, BufferHost) {
    run_with_limits(source, DEFAULT_STEP_BUDGET, DEFAULT_MAX_CALL_DEPTH)
}

fn output_of(source: &str) -> String {
    let (result, host) = run(source);
    result.unwrap();
    host.output()
}

fn error_of(source: &str) -> EvalError {
    let (result, _) = run(source);
    result.unwrap_err()
}

// Scenario tests from the language contract.

#[test]
fn recursion_factorial() {
    let source = "f := (n) -> { if n <= 1 { return 1; }; return n * f(n - 1); }; println(f(5));";
    assert_eq!(output_of(source), "120");
}

#[test]
fn range_loop_sums_half_open() {
    let source = "sum := 0; for i in 5 { sum = sum + i; }; println(sum);";
    assert_eq!(output_of(source), "10");
}

#[test]
fn append_is_persistent() {
    let source = "a := []; b := append(a, 1); println(a); println(b);";
    let (result, host) = run(source);
    result.unwrap();
    assert_eq!(host.chunks(), ["[]", "[1]"]);
}

#[test]
fn undefined_variable_aborts_without_prior_output() {
    let (result, host) = run("println(x);");
    let err = result.unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "x".to_owned()
        }
    );
    assert!(host.chunks().is_empty());
}

#[test]
fn determinism_byte_identical_output() {
    let source = "data := []; for i in 4 { data = append(data, i * i); }; println(data);";
    assert_eq!(output_of(source), output_of(source));
    assert_eq!(output_of(source), "[0,1,4,9]");
}

// Functions and closures.

#[test]
fn arity_is_exact() {
    let err = error_of("f := (a, b) -> { return a; }; f(1);");
    assert_eq!(err.kind, EvalErrorKind::Arity { expected: 2, got: 1 });

    let err = error_of("f := () -> { return 1; }; f(1, 2);");
    assert_eq!(err.kind, EvalErrorKind::Arity { expected: 0, got: 2 });
}

#[test]
fn function_body_without_return_yields_null() {
    assert_eq!(output_of("f := (n) -> { n * 2; }; println(f(21));"), "");
}

#[test]
fn empty_function_body_yields_null() {
    assert_eq!(output_of("f := () -> { }; println(f());"), "");
}

#[test]
fn return_unwinds_only_its_own_frame() {
    let source = "
        inner := () -> { return 1; };
        outer := () -> { inner(); return 2; };
        println(outer());
    ";
    assert_eq!(output_of(source), "2");
}

#[test]
fn return_at_top_level_fails() {
    let err = error_of("return 1;");
    assert_eq!(err.kind, EvalErrorKind::ReturnOutsideFunction);
}

#[test]
fn closure_escapes_defining_frame() {
    let source = "
        make := (start) -> { return (n) -> { return start + n; }; };
        add5 := make(5);
        println(add5(3));
    ";
    assert_eq!(output_of(source), "8");
}

#[test]
fn closures_share_the_defining_scope() {
    // Two closures over the same frame observe each other's assignment.
    let source = "
        make := () -> {
            count := 0;
            bump := () -> { count = count + 1; return count; };
            return bump;
        };
        c := make();
        c();
        c();
        println(c());
    ";
    assert_eq!(output_of(source), "3");
}

#[test]
fn functions_are_values() {
    let source = "apply := (f, v) -> { return f(v); }; println(apply((n) -> { return n + 1; }, 41));";
    assert_eq!(output_of(source), "42");
}

#[test]
fn calling_a_non_function_fails() {
    let err = error_of("x := 3; x();");
    assert_eq!(err.kind, EvalErrorKind::NotCallable { kind: "number" });
}

// Scoping.

#[test]
fn shadowing_restores_outer_binding() {
    let source = "
        x := 1;
        if true { x := 2; println(x); };
        println(x);
    ";
    let (result, host) = run(source);
    result.unwrap();
    assert_eq!(host.chunks(), ["2", "1"]);
}

#[test]
fn redeclaration_in_same_scope_fails() {
    let err = error_of("x := 1; x := 2;");
    assert_eq!(
        err.kind,
        EvalErrorKind::RedeclaredVariable {
            name: "x".to_owned()
        }
    );
}

#[test]
fn assignment_to_unbound_name_fails() {
    let err = error_of("y = 1;");
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "y".to_owned()
        }
    );
}

#[test]
fn loop_locals_do_not_leak_across_iterations() {
    let source = "for i in 3 { t := i; }; println(1);";
    assert_eq!(output_of(source), "1");
}

// Control flow values.

#[test]
fn if_chain_value_is_the_taken_branches_last_expression() {
    // The chain's value flows into the enclosing block's value, observable
    // as the program result.
    let (result, _) = run("if false { 1; } elif true { 2; } else { 3; };");
    assert_eq!(result.unwrap(), Value::Number(2.0));

    let (result, _) = run("if false { 1; };");
    assert_eq!(result.unwrap(), Value::Null);
}

#[test]
fn if_without_match_yields_nothing() {
    assert_eq!(output_of("if false { println(1); }; println(2);"), "2");
}

#[test]
fn elif_chain_picks_first_truthy() {
    let source = "
        grade := (n) -> {
            if n >= 90 { return \"a\"; } elif n >= 80 { return \"b\"; } else { return \"c\"; };
        };
        println(grade(85));
    ";
    assert_eq!(output_of(source), "b");
}

#[test]
fn loops_are_statements_not_values() {
    // The loop's own value is Null, observable as the program result.
    let (result, _) = run("for i in 3 { i; };");
    assert_eq!(result.unwrap(), Value::Null);
}

// Logic.

#[test]
fn and_or_short_circuit() {
    let source = "
        called := 0;
        effect := () -> { called = called + 1; return true; };
        false and effect();
        true or effect();
        println(called);
    ";
    assert_eq!(output_of(source), "0");
}

#[test]
fn logic_results_are_bools() {
    let (result, host) = run("println(1 and 2); println(0 or null); println(not \"\");");
    result.unwrap();
    assert_eq!(host.chunks(), ["true", "false", "true"]);
}

// Collections.

#[test]
fn array_indexing() {
    assert_eq!(output_of("a := [10, 20, 30]; println(a[1]);"), "20");
}

#[test]
fn array_index_out_of_range_fails() {
    let err = error_of("a := [1]; a[1];");
    assert_eq!(err.kind, EvalErrorKind::IndexOutOfBounds { index: 1, len: 1 });

    let err = error_of("a := [1]; a[-1];");
    assert!(matches!(err.kind, EvalErrorKind::IndexOutOfBounds { .. }));
}

#[test]
fn fractional_index_fails() {
    let err = error_of("a := [1, 2]; a[0.5];");
    assert!(matches!(err.kind, EvalErrorKind::NonIntegerIndex { .. }));
}

#[test]
fn string_indexing_yields_one_character() {
    assert_eq!(output_of("s := \"дом\"; println(s[1]);"), "о");
}

#[test]
fn map_lookup_and_missing_key() {
    assert_eq!(
        output_of("m := {\"a\": 1, \"b\": 2}; println(m[\"b\"]);"),
        "2"
    );

    let err = error_of("m := {\"a\": 1}; m[\"z\"];");
    assert_eq!(
        err.kind,
        EvalErrorKind::KeyNotFound {
            key: "z".to_owned()
        }
    );
}

#[test]
fn map_indexed_by_non_string_fails() {
    let err = error_of("m := {\"a\": 1}; m[0];");
    assert!(matches!(err.kind, EvalErrorKind::IndexType { .. }));
}

#[test]
fn map_keys_must_be_strings() {
    let err = error_of("{1: 2};");
    assert_eq!(err.kind, EvalErrorKind::MapKeyType { got: "number" });
}

#[test]
fn map_iteration_order_is_insertion_order() {
    let source = "
        m := {\"первый\": 1, \"второй\": 2, \"третий\": 3};
        for v in m { println(v); };
    ";
    let (result, host) = run(source);
    result.unwrap();
    assert_eq!(host.chunks(), ["1", "2", "3"]);
}

#[test]
fn two_binding_loop_over_map() {
    let source = "m := {\"a\": 1, \"b\": 2}; for k, v in m { println(k || \"=\" || v); };";
    let (result, host) = run(source);
    result.unwrap();
    assert_eq!(host.chunks(), ["a=1", "b=2"]);
}

#[test]
fn two_binding_loop_over_array() {
    let source = "a := [\"x\", \"y\"]; for i, el in a { println(i || el); };";
    let (result, host) = run(source);
    result.unwrap();
    assert_eq!(host.chunks(), ["0x", "1y"]);
}

#[test]
fn strings_are_not_iterable() {
    let err = error_of("for c in \"abc\" { c; };");
    assert_eq!(err.kind, EvalErrorKind::NotIterable { kind: "string" });
}

#[test]
fn pair_iteration_over_number_fails() {
    let err = error_of("for a, b in 3 { a; };");
    assert_eq!(err.kind, EvalErrorKind::NoPairIteration { kind: "number" });
}

#[test]
fn append_accepts_extra_values() {
    assert_eq!(
        output_of("a := append([], 1, 2, 3); println(a);"),
        "[1,2,3]"
    );
}

#[test]
fn append_requires_an_array() {
    let err = error_of("append(1, 2);");
    assert!(matches!(err.kind, EvalErrorKind::ArgumentType { .. }));
}

#[test]
fn len_builtin() {
    let (result, host) = run("println(len([1, 2, 3])); println(len(\"дом\")); println(len({}));");
    result.unwrap();
    assert_eq!(host.chunks(), ["3", "3", "0"]);
}

// Operators through the full pipeline.

#[test]
fn concat_operator_renders_mixed_kinds() {
    assert_eq!(
        output_of("println(\"sum=\" || 40 + 2 || \", ok=\" || true);"),
        "sum=42, ok=true"
    );
}

#[test]
fn type_error_names_operator_and_kinds() {
    let err = error_of("1 + \"x\";");
    assert_eq!(
        err.message,
        "operator `+` cannot be applied to number and string"
    );
    assert!(err.span.is_some());
}

// Host bridge.

#[test]
fn println_emits_one_chunk_per_call() {
    let (result, host) = run("println(1, 2, 3); println();");
    result.unwrap();
    assert_eq!(host.chunks(), ["123", ""]);
}

#[test]
fn draw_forwards_verbatim() {
    let source = "
        rows := [{\"month\": \"jan\", \"total\": 12}, {\"month\": \"feb\", \"total\": 15}];
        draw(\"line\", rows, {\"idField\": \"month\", \"valueFields\": [\"total\"], \"title\": \"Totals\"});
    ";
    let (result, host) = run(source);
    result.unwrap();
    assert_eq!(host.draws().len(), 1);

    let command = &host.draws()[0];
    assert_eq!(command.chart, "line");
    assert_eq!(
        command.rows.display(),
        "[{month:jan,total:12},{month:feb,total:15}]"
    );
    assert_eq!(
        command.options.display(),
        "{idField:month,valueFields:[total],title:Totals}"
    );
}

#[test]
fn draw_requires_three_arguments() {
    let err = error_of("draw(\"line\");");
    assert_eq!(err.kind, EvalErrorKind::Arity { expected: 3, got: 1 });
}

#[test]
fn draw_chart_tag_must_be_string() {
    let err = error_of("draw(1, [], {});");
    assert!(matches!(err.kind, EvalErrorKind::ArgumentType { .. }));
}

// Resource bounds.

#[test]
fn step_budget_stops_long_loops() {
    let (result, _) = run_with_limits("for i in 100000000 { i; };", 10_000, 500);
    let err = result.unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::BudgetExhausted { budget: 10_000 });
}

#[test]
fn unbounded_recursion_hits_depth_ceiling() {
    let (result, _) = run_with_limits("f := (n) -> { return f(n + 1); }; f(0);", 10_000_000, 64);
    let err = result.unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::RecursionLimit { depth: 64 });
}

#[test]
fn runs_do_not_share_state() {
    // Each run gets a fresh global scope; a declaration from one run does
    // not exist in the next.
    let interner = StringInterner::new();
    let tokens = lex("x := 1; println(x);", &interner).unwrap();
    let program = parse(&tokens, &interner).unwrap();

    let mut first = BufferHost::new();
    Interpreter::new(&interner, &program.arena, &mut first)
        .run(program.root)
        .unwrap();

    let mut second = BufferHost::new();
    Interpreter::new(&interner, &program.arena, &mut second)
        .run(program.root)
        .unwrap();

    assert_eq!(first.output(), second.output());
}

#[test]
fn sample_playground_program() {
    let source = "
factorial := (n) -> {
	if n <= 1 {
		return 1;
	};
	return n * factorial(n-1);
};

sum := 0;

for i in 8 {
	sum = sum + factorial(i);
};

println(sum);
";
    // 0! + 1! + ... + 7! = 1+1+2+6+24+120+720+5040
    assert_eq!(output_of(source), "5914");
}
