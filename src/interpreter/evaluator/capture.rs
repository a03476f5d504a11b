use std::collections::HashSet;

use crate::{
    ast::{AssignOperator, Constant, Node, NodeKind},
    interpreter::evaluator::function::core::is_builtin,
    util::stack::ensure_sufficient_stack,
};

/// Finds the variables a function body takes from its surroundings.
///
/// Every identifier in `body` is classified as one of:
/// - a parameter;
/// - a name the body declares with `:=` earlier in the same or an enclosing
///   block;
/// - a builtin constant or function;
/// - a free variable.
///
/// Free variables are returned once each, in order of first appearance.
/// Function names in calls count as identifiers, so calling a function from
/// the defining scope captures it.
///
/// # Example
/// ```
/// use tensorpad::interpreter::{evaluator::capture::free_variables, parser::core::parse_expression};
///
/// let body = parse_expression("{ total := scale * x; total + offset + sin(x) }").unwrap();
/// let free = free_variables(&["x".to_string()], &body);
///
/// assert_eq!(free, vec!["scale".to_string(), "offset".to_string()]);
/// ```
#[must_use]
pub fn free_variables(params: &[String], body: &Node) -> Vec<String> {
    let mut analysis = Analysis { scopes: vec![params.iter().cloned().collect()],
                                  free:   Vec::new(), };
    analysis.visit(body);
    analysis.free
}

/// Walks a body while simulating the scopes it will open when it runs.
struct Analysis {
    scopes: Vec<HashSet<String>>,
    free:   Vec<String>,
}

impl Analysis {
    fn is_local(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn reference(&mut self, name: &str) {
        if self.is_local(name)
           || Constant::from_name(name).is_some()
           || is_builtin(name)
           || self.free.iter().any(|free| free == name)
        {
            return;
        }
        self.free.push(name.to_string());
    }

    fn scoped(&mut self, names: HashSet<String>, f: impl FnOnce(&mut Self)) {
        self.scopes.push(names);
        f(self);
        self.scopes.pop();
    }

    fn visit(&mut self, node: &Node) {
        ensure_sufficient_stack(|| {
            match &node.kind {
                NodeKind::Identifier(name) => self.reference(name),
                NodeKind::FunctionCall { name, args, .. } => {
                    self.reference(name);
                    for arg in args {
                        self.visit(arg);
                    }
                },
                NodeKind::Assignment { target, op, value } => match (&target.kind, op) {
                    (NodeKind::Identifier(name), AssignOperator::Declare) => {
                        self.visit(value);
                        self.declare(name);
                    },
                    (NodeKind::FunctionCall { name, args, .. }, _) => {
                        self.declare(name);
                        let params = args.iter()
                                         .filter_map(Node::as_identifier)
                                         .map(str::to_string)
                                         .collect();
                        self.scoped(params, |analysis| analysis.visit(value));
                    },
                    _ => {
                        self.visit(target);
                        self.visit(value);
                    },
                },
                NodeKind::Block { statements } => self.scoped(HashSet::new(), |analysis| {
                                                       for statement in statements {
                                                           analysis.visit(&statement.node);
                                                       }
                                                   }),
                NodeKind::ForLoop { .. } => self.scoped(HashSet::new(), |analysis| {
                                                for child in node.children() {
                                                    analysis.visit(child);
                                                }
                                            }),
                _ => {
                    for child in node.children() {
                        self.visit(child);
                    }
                },
            }
        });
    }
}
