use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tensorpad::{
    ast::{Node, Span},
    get_result,
    interpreter::{
        evaluator::unary::transpose,
        parser::core::parse_expression,
        value::{core::Value, tensor::Tensor},
    },
    parse, run,
};

/// Kinds and leaf text of a tree, without positions.
fn structure(node: &Node, source: &str) -> String {
    if node.is_leaf() {
        return format!("{}({})", node.kind_name(), node.span.text(source));
    }

    let children = node.children()
                       .into_iter()
                       .map(|child| structure(child, source))
                       .collect::<Vec<_>>();
    format!("{}[{}]", node.kind_name(), children.join(", "))
}

fn all_nodes<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    out.push(node);
    for child in node.children() {
        all_nodes(child, out);
    }
}

const PROGRAMS: &[&str] = &["1 + 2 * 3 + 4^(sin(PI/2)*2)",
                            "fib(x) := x <= 1 ? 1 : fib(x - 1) + fib(x-2)\n\nfib(10)",
                            "x := T(3,3); x[[[0,0],[1,1],[2,2]]] = [1,1,1]; x",
                            "x := 2 * {\n  y := 0;\n  for i := 0; i < 10; i = i+1 {\n    y += 1\n  }\n  y\n}",
                            "funcs := <>; funcs += f; g(y, func) := 2 * func(y)",
                            "alarm := 7:30pm - 9:05; toHm(alarm)",
                            "line := ~[[1, 1], [1, -1],]; ~(A ** line)[0]",
                            "\"a \\\" b\" + \"c\"; -(-x)"];

#[test]
fn every_node_reparses_from_its_span() {
    for source in PROGRAMS {
        let program = parse(source);
        assert!(program.parse_error.is_none(), "{source} did not parse");

        let mut nodes = Vec::new();
        for statement in &program.statements {
            all_nodes(&statement.node, &mut nodes);
        }

        for node in nodes {
            let text = node.span.text(source);
            let reparsed = parse_expression(text).unwrap_or_else(|| panic!("{text:?} did not reparse"));
            assert_eq!(structure(&reparsed, text), structure(node, source));
        }
    }
}

#[test]
fn parent_spans_cover_their_children() {
    for source in PROGRAMS {
        let program = parse(source);
        let mut nodes = Vec::new();
        for statement in &program.statements {
            all_nodes(&statement.node, &mut nodes);
        }

        for node in nodes {
            for child in node.children() {
                assert!(node.span.contains(child.span),
                        "{:?} does not cover {:?} in {source}",
                        node.span.text(source),
                        child.span.text(source));
            }
        }
    }
}

#[test]
fn identity_matmul_sized_four() {
    assert_eq!(get_result("A := I(4); v := [1,2,3,4]; A ** v").unwrap(),
               Value::from(Tensor::vector(vec![1.0, 2.0, 3.0, 4.0]).unwrap()));
}

fn same_number(a: &Value, b: f64) -> bool {
    match a {
        Value::Number(n) if n.is_nan() => b.is_nan(),
        Value::Number(n) => n.to_bits() == b.to_bits() || *n == b,
        _ => false,
    }
}

fn matrix() -> impl Strategy<Value = Tensor> {
    (1_usize..5, 1_usize..5).prop_flat_map(|(h, w)| {
                                prop::collection::vec(-1000.0_f64..1000.0, h * w).prop_map(move |data| {
                                    Tensor::new(vec![h, w], data).unwrap()
                                })
                            })
}

fn vector_literal(data: &[f64]) -> String {
    let items = data.iter().map(ToString::to_string).collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}

proptest! {
    #[test]
    fn number_arithmetic_matches_ieee(a in -1.0e6_f64..1.0e6, b in -1.0e6_f64..1.0e6) {
        prop_assume!(b != 0.0);

        let cases = [("+", a + b), ("-", a - b), ("*", a * b), ("/", a / b), ("%", a % b), ("^", a.powf(b))];
        for (op, expected) in cases {
            let source = format!("({a}) {op} ({b})");
            let result = get_result(&source).unwrap();
            prop_assert!(same_number(&result, expected), "{source} gave {result}, wanted {expected}");
        }
    }

    #[test]
    fn tensors_keep_shape_and_length(t in matrix()) {
        prop_assert_eq!(t.len(), t.shape().iter().product::<usize>());
    }

    #[test]
    fn transpose_twice_is_identity(t in matrix()) {
        let once = transpose(&t, Span::default()).unwrap();
        prop_assert_eq!(once.shape(), &[t.shape()[1], t.shape()[0]]);

        let twice = transpose(&once, Span::default()).unwrap();
        prop_assert_eq!(twice, t);
    }

    #[test]
    fn identity_matmul_leaves_vectors_alone(data in prop::collection::vec(-1000_i32..1000, 1..8)) {
        let data = data.into_iter().map(f64::from).collect::<Vec<_>>();
        let source = format!("I({}) ** {}", data.len(), vector_literal(&data));

        let result = get_result(&source).unwrap();
        prop_assert_eq!(result, Value::from(Tensor::vector(data).unwrap()));
    }

    #[test]
    fn captures_see_later_mutation(start in -100_i32..100, later in -100_i32..100) {
        let source = format!("i := {start}; get(x) := i + x; i = {later}; get(0)");
        let context = run(&source);

        prop_assert!(context.errors.is_empty());
        prop_assert_eq!(context.program_result, Value::Number(f64::from(later)));
    }
}
