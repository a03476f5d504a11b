use std::fs::{self};

use pretty_assertions::assert_eq;
use tensorpad::{
    error::RuntimeError,
    get_result,
    interpreter::{
        evaluator::{
            core::EvalOptions,
            function::output::{OutputKind, OutputRecord},
        },
        value::core::Value,
    },
    run, run_with_options,
};
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_dsl_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = get_result(&code) {
                panic!("DSL example {} in {:?} failed:\n{}\nError: {:?}",
                       i + 1,
                       path,
                       code,
                       e.to_string());
            }
        }
    }

    assert!(count > 0, "No DSL examples found in book/src");
}

fn extract_dsl_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```tensorpad") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn assert_success(src: &str) {
    if let Err(e) = get_result(src) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if get_result(src).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

/// Compares the displayed result with whitespace removed, so tensors can be
/// written on one line.
fn assert_result(src: &str, expected: &str) {
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();

    match get_result(src) {
        Ok(value) => assert_eq!(strip(&value.to_string()), strip(expected), "script: {src}"),
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn assert_error(src: &str, message: &str) {
    match get_result(src) {
        Ok(value) => panic!("Script succeeded with {value} but was expected to fail"),
        Err(e) => assert_eq!(e.to_string(), message),
    }
}

#[test]
fn basic_arithmetic() {
    assert_result("-1 + 1", "0");
    assert_result("1 + 2 * 3 + 4^(sin(PI/2)*2)", "23");
    assert_result("1 * 2 + 3 * 2^2", "14");
    assert_result("2^(1+1) + (2 * 3)", "10");
    assert_result("7 % 3", "1");
    assert_result("-7 % 3", "-1");
    assert_result("0.1 + 0.2", "0.30000000000000004");
    assert_result("1 / 0", "Infinity");
    assert_result("sin(PI) + cos(PI)", "-0.9999999999999999");
}

#[test]
fn comparisons_yield_one_or_zero() {
    assert_result("2 < 3", "1");
    assert_result("3 <= 2", "0");
    assert_result("19 > 20", "0");
    assert_result("3 >= 3", "1");
    assert_result("0.1 + 0.2 == 0.3", "1");
    assert_result("[1, 2] == [1, 3]", "shape: 2, data: [1, 0]");
}

#[test]
fn variables() {
    assert_result("x := 3;\ny := 33 * x;\nx = y * x + x", "300");
    assert_result("x := 2; x += 3; x -= 1; x", "4");
    assert_result("x := // 324234 * sin(x)\n3; x", "3");
}

#[test]
fn variable_redeclaration_fails() {
    assert_error("y := 3; y := 3", "variable y already defined, with value: 3");
    assert_success("y := 3; { y := 4 }; y");
}

#[test]
fn undeclared_variables_fail() {
    assert_error("sin(x)",
                 "the variable x hasn't been declared yet. You can do something like x := 2; to declare it.");
    assert_error("x = 2",
                 "the variable x hasn't been declared yet. You can do something like x := 2; to declare it.");
}

#[test]
fn for_loop_variables_are_local() {
    let src = "
x := 1
x = 2
i := -42
for i := 0; i < 3; i=i+1 {
    print(i)
}
i
";
    assert_result(src, "-42");
    assert_result("x := 0;\nfor i := 0; i < 5; i=i+1 { x = x + 1; }\nx", "5");
    assert_result("x := 0;\nfor i := 0; i < 5; i=i+1 { x = x + 1; }\nfor i := 0; i < 5; i=i+1 { x = x + 1; }\nx",
                  "10");
}

#[test]
fn blocks_yield_their_last_statement() {
    let src = "
x := 2 * {
    y := 0;
    for i := 0; i < 10; i = i+1 {
        y += 1
    }
    y
};

x
";
    assert_result(src, "20");
    assert_result("{}", "{}");
}

#[test]
fn ternary() {
    assert_result("0 ? 100 : 2^2", "4");
    assert_result("0.5 ? 1 : 2", "1");
    assert_result("0 ? 1 : 0 ? 2 : 3", "3");
    assert_error("\"a\" ? 1 : 2",
                 "condition needs to be a number, anything less than 0.5 is false, anything >= 0.5 is true");
}

#[test]
fn strings() {
    assert_result(r#""<p onclick='alert(\"efaf\")'>dasdas</p>""#,
                  r#"<p onclick='alert("efaf")'>dasdas</p>"#);
    assert_result(r#""ab" + "cd""#, "abcd");
    assert_error(r#"123123 + "a""#, "the operation NUMBER + STRING doesn't exist yet");
}

#[test]
fn clock_literals_are_minutes() {
    assert_result("9:05", "545");
    assert_result("7:30pm", "1170");
    assert_result("12:00 PM", "720");
    assert_result("toHm(7:30pm - 9:05)", "10h 25m");
}

#[test]
fn user_defined_functions() {
    assert_result("f(x) := x^2\n\ng(y, func) := 2 * func(y)\n\ng(2, f)", "8");
    assert_result("fib(x) := x <= 1 ? 1 : fib(x - 1) + fib(x-2)\n\nfib(10)", "89");
    assert_result("square(x) := x * x; square(3)", "9");
    assert_result("zero() := 0; zero()", "0");
}

#[test]
fn function_errors() {
    assert_error("f(x) := x; f(1, 2)",
                 "user defined function f wants 1 arguments, only 2 were provided");
    assert_error("x := 1; x(2)", "'x' is not a function that can be called");
    assert_error("nope(2)", "function 'nope' not found");
    assert_error("sin := 3", "a builtin function already exists with this name");
    assert_error("sin(x) := x", "a builtin function already exists with this name");
    assert_error("f(1) := 2",
                 "declaration of function f accepts an invalid variable: '1' (hint: variable names have no spaces or punctuation, and don't start with numbers)");
    assert_error("f(x) += 1", "functions can only be defined with := or =, not +=");
    assert_error("PI := 3", "PI is a builtin constant and can't be assigned to");
}

#[test]
fn functions_display_their_source_and_captures() {
    assert_result("offset := 2; f(x) := x + offset; f", "f(x) := x + offset where offset=2");
    assert_result("f(x) := x; f", "f(x) := x");
}

#[test]
fn closures_share_captured_cells() {
    let src = "
i := 0
f(x) := {
    i += x
    i
}

f(4)
";
    assert_result(src, "4");
    assert_result("i := 0; bump(x) := { i += x; i }; bump(2); bump(3); i", "5");
    assert_result("i := 1; get() := i; i = 7; get()", "7");
}

#[test]
fn closures_do_not_capture_params_or_locals() {
    assert_result("x := 100; f(x) := x * 2; f(3)", "6");
    assert_result("total := 100; f(x) := { total := x; total }; f(3)", "3");
    assert_result("total := 100; f(x) := { total := x; total }; f(3); total", "100");
}

#[test]
fn closures_in_loops_keep_their_iteration() {
    let src = "
funcs := <>;
for i := 0; i < 3; i+=1 {
    j := i + 1
    f(x) := j * x
    funcs += f;
}

g(x) := {
    sum := 0;
    for i := 0; i < len(funcs); i+= 1 {
        f := funcs[i];
        sum += f(x);
    }

    sum
}

g(10)
";
    assert_result(src, "60");
}

#[test]
fn tensor_literals() {
    assert_result("[[1, 2, 3], [1, 2, 3]]", "shape: 2x3, data: [[1, 2, 3], [1, 2, 3]]");
    assert_result("[1, 2, 3,]", "shape: 3, data: [1, 2, 3]");
    assert_error("[[1, 2], [3]]", "one of the elements of the tensor was the wrong size: [3]");
    assert_error("[]", "can't have a zero-length vector");
    assert_failure("[1, [2]]");
}

#[test]
fn tensor_constructors() {
    let context = run("T(10, 10)");
    assert!(context.errors.is_empty());
    let Value::Tensor(t) = &context.program_result else {
        panic!("wanted a tensor, got {}", context.program_result);
    };
    assert_eq!(t.shape(), &[10, 10]);
    assert_eq!(t.len(), 100);
    assert!(t.data().iter().all(|&x| x == 0.0));

    assert_result("I(2)", "shape: 2x2, data: [[1, 0], [0, 1]]");
    assert_failure("T(0)");
    assert_failure("T(1.5)");
}

#[test]
fn matrix_multiplication() {
    assert_result("A := I(4);\n\nv := [1,2,3,4]\n\nA ** v", "shape: 4, data: [1, 2, 3, 4]");
    assert_result("[1, 2, 3] ** [4, 5, 6]", "32");
    assert_result("[[1, 2], [3, 4]] ** [[5, 6], [7, 8]]",
                  "shape: 2x2, data: [[19, 22], [43, 50]]");
    assert_result("[1, 2] ** [[1, 2], [3, 4]]", "shape: 2, data: [7, 10]");
    assert_error("[[1, 2, 3]] ** [[1, 2]]",
                 "second matrix row count (1) must equal first matrix column count 3");
    assert_error("T(2, 2, 2) ** T(2, 2)",
                 "matrix multiplication only works with matrices/vectors for now");
}

#[test]
fn matrix_transpose() {
    let src = "
A:= [[1,  2,  3],
     [1,  2,  3],
     [2,  4,  6]]
~A
";
    assert_result(src, "shape: 3x3, data: [[1,  1,  2], [2,  2,  4], [3,  3,  6]]");
    assert_result("~[1, 2, 3]", "shape: 3x1, data: [[1], [2], [3]]");
    assert_failure("~T(2, 2, 2)");
    assert_error("~3", "unary op ~ can't be used on NUMBER");
}

#[test]
fn matrix_mult_then_transpose() {
    let src = "
// Draw some line segments:
line := ~[
    [1, 1],
    [1, 1],
    [1, 1],
    [1, 1],
]

// zero the x coordinates
A := [[1, 0],
      [0, 0]]

print(A)
print(~A)
print(line)
~(A ** line)
";
    let context = run(src);
    assert!(context.errors.is_empty(), "{:?}", context.errors);
    assert_eq!(context.results.len(), 3);

    let Value::Tensor(t) = &context.program_result else {
        panic!("wanted a tensor, got {}", context.program_result);
    };
    assert_eq!(t.shape(), &[4, 2]);
    for point in t.data().chunks(2) {
        assert_eq!(point, &[1.0, 0.0]);
    }
}

#[test]
fn elementwise_operations_broadcast() {
    assert_result("[[1, 2], [3, 4]] + [10, 20]", "shape: 2x2, data: [[11, 22], [13, 24]]");
    assert_result("[1, 2, 3] * [2]", "shape: 3, data: [2, 4, 6]");
    assert_result("-[1, 2]", "shape: 2, data: [-1, -2]");
    assert_error("[1, 2] + [1, 2, 3]", "wrong sizes: [2], [3]");
    assert_error("[1, 2] + 1",
                 "the operation TENSOR + NUMBER doesn't exist yet (hint: for now you have to put [] around the number)");
}

#[test]
fn indexing() {
    assert_result("x := [[1,2,3], [4,5,6]]; x[1][0]", "4");
    assert_result("[[1,2,3],[4,5,6]][0]", "shape: 3, data: [1, 2, 3]");
    assert_result("[[1,2,3],[4,5,6]][1][[0, 2]]", "shape: 2, data: [4, 6]");
    assert_result("[[1,2,3],[4,5,6]][[[0, 1], [1, 2]]]", "shape: 2, data: [2, 6]");
    assert_error("x := [1, 2]; x[2]", "index 2 in x[2] was out of bounds");
    assert_error("x := [1, 2]; x[-1]", "index -1 in x[-1] was out of bounds");
    assert_error("x := [1, 2]; x[0][0]", "the indexing part of x[0][0] has too many dimensions");
    assert_error("x := 3; x[0]", "the type NUMBER cannot be indexed yet");
}

#[test]
fn indexing_with_fewer_dimensions_returns_blocks() {
    assert_result("[[[1,2,3],[4,5,6]], [[4,4,4],[4,5,6]]][[0, 1]]",
                  "shape: 2x2x3, data: [[[1, 2, 3], [4, 5, 6]], [[4, 4, 4], [4, 5, 6]]]");
    assert_result("[[[1,2,3],[4,5,6]], [[4,4,4],[4,5,6]]][1]",
                  "shape: 2x3, data: [[4, 4, 4], [4, 5, 6]]");
}

#[test]
fn assigning_to_indices() {
    assert_result("x := [1,2,3]; x[0]=2; x\nx = T(2,3); x[0] = [1,2,3]; x",
                  "shape: 2x3, data: [[1, 2, 3], [0, 0, 0]]");
    assert_result("x := T(3,3); x[[[0,0],[1,1],[2,2]]] = [1,1,1]; x",
                  "shape: 3x3, data: [[1, 0, 0], [0, 1, 0], [0, 0, 1]]");
    assert_result("x := T(2,2); x[1] = 7; x", "shape: 2x2, data: [[0, 0], [7, 7]]");
    assert_result("x := [1, 2]; x[1] += 5; x", "shape: 2, data: [1, 7]");
    assert_error("x := [1]; x[0] := 2",
                 "x[0] := 2 - can't declare a new variable inside a thing, doesn't make sense conceptually (hint: just use '=')");
    assert_error("x := T(2, 2); x[0] = [1, 2, 3]", "rhs must be a tensor with shape 2");
}

#[test]
fn identity_matrix_via_loop() {
    assert_result("x := T(10, 10);\nfor i:=0; i < 10; i = i+1 {\n\tx[i][i]=1\n}\n\nx",
                  "shape: 10x10, data:[[1, 0, 0, 0, 0, 0, 0, 0, 0, 0],[0, 1, 0, 0, 0, 0, 0, 0, 0, 0],[0, 0, 1, 0, 0, 0, 0, 0, 0, 0],[0, 0, 0, 1, 0, 0, 0, 0, 0, 0],[0, 0, 0, 0, 1, 0, 0, 0, 0, 0],[0, 0, 0, 0, 0, 1, 0, 0, 0, 0],[0, 0, 0, 0, 0, 0, 1, 0, 0, 0],[0, 0, 0, 0, 0, 0, 0, 1, 0, 0],[0, 0, 0, 0, 0, 0, 0, 0, 1, 0],[0, 0, 0, 0, 0, 0, 0, 0, 0, 1]]");
}

#[test]
fn tensors_are_values_lists_are_shared() {
    assert_result("a := [1, 2]; b := a; b[0] = 5; a", "shape: 2, data: [1, 2]");
    assert_result("a := <1>; b := a; b += 2; len(a)", "2");
    assert_result("l := <1, 2>; l[1] = 5; l[1]", "5");
    assert_error("l := <<1>>; l[0][0]", "can't index thing inside a thing yet");
    assert_error("l := <1>; l[[0]]", "lists can only be indexed by a NUMBER, not TENSOR");
}

#[test]
fn builtins() {
    assert_result("max(1, 5, 3)", "5");
    assert_result("min(4, -2)", "-2");
    assert_result("hypot(3, 4)", "5");
    assert_result("imul(3, 4)", "12");
    assert_result("round(2.5)", "3");
    assert_result("round(-2.5)", "-2");
    assert_result("sign(0)", "0");
    assert_result("sign(-42)", "-1");
    assert_result("atan2(0, 1)", "0");
    assert_result("pow(2, 10)", "1024");
    assert_result("lerp(0, 10, 2)", "10");
    assert_result("len(\"héllo\")", "5");
    assert_result("len([[1, 2], [3, 4], [5, 6]])", "3");
    assert_result("dot([1, 2, 3], [4, 5, 6])", "32");
    assert_result("toVec(<1, 2, 3>)", "shape: 3, data: [1, 2, 3]");
    assert_result("toVec(<[1, 2], [3, 4]>)", "shape: 2x2, data: [[1, 2], [3, 4]]");
    assert_result("toHm(450)", "7h 30m");

    let r = get_result("random()").unwrap();
    assert!(matches!(r, Value::Number(n) if (0.0..1.0).contains(&n)));
}

#[test]
fn builtin_errors() {
    assert_error("sin()", "function sin takes 1 arguments, 0 were provided");
    assert_error("sqrt(\"nine\")",
                 "Argument 0 to function sqrt was of type STRING, but it wants NUMBER");
    assert_error("toVec(3)", "Argument 0 to function toVec was of type NUMBER, but it wants LIST");
    assert_error("toVec(<>)", "can't have a zero-length vector");
    assert_error("dot([1, 2], [1, 2, 3])",
                 "two tensors must have the same shape for a dot product");
    assert_error("len(3)", "can't take the length of type NUMBER");
}

#[test]
fn print_records_results() {
    let context = run("x := 3; print(x); print(4, \"four\"); print(5)");
    assert!(context.errors.is_empty());
    assert_eq!(context.program_result, Value::Null);

    let titles = context.results
                        .iter()
                        .map(|record| match record {
                            OutputRecord::Print { title, .. } => title.clone(),
                            other => panic!("unexpected {:?}", other.kind()),
                        })
                        .collect::<Vec<_>>();
    assert_eq!(titles,
               vec![Some("x".to_string()), Some("four".to_string()), None]);
}

#[test]
fn graph_and_plot_record_results() {
    let src = "
graph(
    f(x) := sin(8 * x),
    g(x) := cos(x),
    0, 2*PI
)

line := [
    [1, 1],
    [1, -1],
    [-1, -1],
]
plot(line, line)
";
    let context = run(src);
    assert!(context.errors.is_empty(), "{:?}", context.errors);

    let kinds = context.results.iter().map(OutputRecord::kind).collect::<Vec<_>>();
    assert_eq!(kinds, vec![OutputKind::Graph, OutputKind::Plot]);

    let OutputRecord::Graph { functions, .. } = &context.results[0] else {
        panic!("wanted a graph");
    };
    assert_eq!(functions.len(), 2);

    let OutputRecord::Plot { point_lists } = &context.results[1] else {
        panic!("wanted a plot");
    };
    assert_eq!(point_lists.len(), 2);
}

#[test]
fn graph_and_plot_errors() {
    assert_error("graph(1, 2)", "arguments to graph are like ...functions, domainStart, domainEnd");
    assert_error("f(x, y) := x; graph(f, 0, 1)",
                 "a function can only have 1 argument to be graphable, for now at least");
    assert_error("f(x) := x; graph(f, 0)",
                 "specify the start and end after the list of functions. eg: graph(f(x) := x, 0, 1)");
    assert_error("plot([1, 2])", "can only plot lists of 2D vectors");
}

#[test]
fn errors_in_loop_bodies_are_recorded_per_iteration() {
    let src = "
print(1 + 1)

for i := 0; i < 10; i+=1 {
    print(123123 + \"a\") // should error
}
";
    let context = run(src);
    assert_eq!(context.errors.len(), 10);
    assert_eq!(context.results.len(), 1);
    assert_eq!(context.program_result, Value::Null);
}

#[test]
fn errors_do_not_stop_later_statements() {
    let context = run("a := q\nb := 2\nb * 3");
    assert_eq!(context.errors.len(), 1);
    assert_eq!(context.program_result, Value::Number(6.0));
}

#[test]
fn parse_errors_stop_evaluation() {
    assert_error("x := )", "Couldn't read line 1 pos 1: \"x := )\"");

    let context = run("x := 1\nprint(x)\ny := (");
    assert_eq!(context.errors.len(), 1);
    assert!(context.results.is_empty());
    assert!(matches!(context.errors[0], RuntimeError::Syntax { .. }));
}

#[test]
fn infinite_loops_hit_the_iteration_limit() {
    let context = run("for i := 0; 1; i += 1 {}");
    assert_eq!(context.errors.len(), 1);
    assert_eq!(context.errors[0].to_string(),
               "possible infinite loop: exceeded 1000000 iterations");

    let options = EvalOptions { max_iterations: 3,
                                ..EvalOptions::default() };
    let context = run_with_options("n := 0; for i := 0; 1; i += 1 { n += 1 }; n", options);
    assert!(matches!(context.errors[0], RuntimeError::IterationLimitExceeded { limit: 3, .. }));
    assert_eq!(context.program_result, Value::Number(3.0));
}

#[test]
fn runaway_recursion_hits_the_depth_limit() {
    let options = EvalOptions { max_call_depth: 100,
                                ..EvalOptions::default() };
    let context = run_with_options("f(x) := f(x + 1); f(0)", options);
    assert_eq!(context.errors.len(), 1);
    assert!(matches!(context.errors[0], RuntimeError::RecursionLimitExceeded { limit: 100, .. }));

    assert_result("down(n) := n <= 0 ? 0 : down(n - 1); down(5000)", "0");
}

#[test]
fn deeply_nested_source_does_not_overflow() {
    let depth = 50_000;
    let source = format!("{}1 + 2{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(get_result(&source).unwrap(), Value::Number(3.0));

    let unclosed = format!("{}1", "(".repeat(depth));
    assert_failure(&unclosed);

    let blocks = 1_000;
    let source = format!("y := 2\nf(x) := {}x + y{}\nf(1)",
                         "{".repeat(blocks),
                         "}".repeat(blocks));
    assert_result(&source, "3");
}

#[test]
fn oversized_tensors_are_errors() {
    assert_error("T(3000000000, 3000000000)", "that tensor is too large");
    assert_error("T(100000, 100000, 100000)", "that tensor is too large");
    assert_error("I(3000000000)", "that matrix is too large");
    assert_error("a := T(20000, 1); b := T(1, 20000); a ** b",
                 "that tensor is too large");
    assert_result("len(T(1000, 1000))", "1000");
}

#[test]
fn lists_containing_themselves() {
    assert_result("l := <>; l += l; l", "<<...>>");
    assert_result("l := <1>; l += l; l += 2; l", "<1, <...>, 2>");
    assert_error("l := <>; l += l; l := 1",
                 "variable l already defined, with value: <<...>>");

    let context = run("l := <>; l += l; print(l)");
    assert!(context.errors.is_empty());
    let OutputRecord::Print { value, .. } = &context.results[0] else {
        panic!("expected a print record");
    };
    assert_eq!(value.to_string(), "<<...>>");

    let first = get_result("a := <>; a += a; a").unwrap();
    let second = get_result("b := <>; b += b; b").unwrap();
    assert_eq!(first, second);
    assert_ne!(first, get_result("c := <>; c += <>; c").unwrap());
}

#[test]
fn functions_capturing_themselves_display() {
    assert_result("g := 0; f(x) := g; g = f; g",
                  "f(x) := g where g=f(x) := g where g=...");
}
