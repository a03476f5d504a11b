use std::rc::Rc;

use crate::{
    ast::{Node, NodeKind, Program, Span, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::{function::output::OutputRecord, scope::ScopeStack},
        value::core::Value,
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure. Errors short-circuit with `?` until
/// a statement or a loop iteration records them.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default ceiling on the iterations of a single for-loop.
pub const MAX_ITERATIONS: usize = 1_000_000;
/// Default ceiling on nested user function calls.
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Limits applied while evaluating a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// A for-loop running this many iterations fails with
    /// [`RuntimeError::IterationLimitExceeded`].
    pub max_iterations: usize,
    /// A call nested deeper than this fails with
    /// [`RuntimeError::RecursionLimitExceeded`].
    pub max_call_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self { max_iterations: MAX_ITERATIONS,
               max_call_depth: MAX_CALL_DEPTH, }
    }
}

/// Stores the state of one program run.
///
/// A context owns the scope stack and collects everything a renderer needs
/// afterwards: the value of the last statement, every recorded error, and the
/// records produced by `print`, `graph` and `plot`. Each run gets its own
/// context; nothing is shared between runs.
///
/// ## Usage
///
/// ```
/// use tensorpad::{
///     interpreter::{
///         evaluator::core::{Context, EvalOptions},
///         parser::core::parse_program,
///         value::core::Value,
///     },
/// };
///
/// let source = "x := 2; x * 21";
/// let mut context = Context::new(source, EvalOptions::default());
/// context.run(&parse_program(source));
///
/// assert_eq!(context.program_result, Value::Number(42.0));
/// assert!(context.errors.is_empty());
/// ```
pub struct Context {
    /// Variable bindings.
    pub scopes:         ScopeStack,
    /// Errors recorded so far, in the order they were caught.
    pub errors:         Vec<RuntimeError>,
    /// Output records appended by `print`, `graph` and `plot`.
    pub results:        Vec<OutputRecord>,
    /// Value of the last evaluated top-level statement.
    pub program_result: Value,
    /// Limits for this run.
    pub options:        EvalOptions,
    /// Source text the spans refer to.
    pub(crate) source:  Rc<str>,
    /// Number of user function calls currently active.
    pub(crate) depth:   usize,
}

impl Context {
    /// Creates a context for evaluating `source`.
    #[must_use]
    pub fn new(source: &str, options: EvalOptions) -> Self {
        Self { scopes: ScopeStack::new(),
               errors: Vec::new(),
               results: Vec::new(),
               program_result: Value::Null,
               options,
               source: Rc::from(source),
               depth: 0 }
    }

    /// Evaluates every statement of `program` in order.
    ///
    /// An error in one statement is recorded and becomes that statement's
    /// value; evaluation continues with the next statement. A program with a
    /// parse error is not evaluated at all: the parse error becomes the
    /// result and the only recorded error.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn run(&mut self, program: &Program) {
        if let Some(parse_error) = &program.parse_error {
            tracing::debug!(%parse_error, "program did not parse");
            let error = RuntimeError::Syntax { message: parse_error.to_string(),
                                               span:    Span::new(parse_error.offset,
                                                                  self.source.len()), };
            self.errors.push(error.clone());
            self.program_result = error.into();
            return;
        }

        for statement in &program.statements {
            let result = self.eval(&statement.node);
            self.program_result = self.record(result);
        }

        tracing::debug!(errors = self.errors.len(),
                        results = self.results.len(),
                        "program finished");
    }

    /// Turns an evaluation result into a value, recording it if it failed.
    pub(crate) fn record(&mut self, result: EvalResult<Value>) -> Value {
        match result {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(%error, "recorded error");
                self.errors.push(error.clone());
                error.into()
            },
        }
    }

    /// The source text covered by `span`, trimmed.
    #[must_use]
    pub fn text(&self, span: Span) -> &str {
        span.text(&self.source).trim()
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches on the node kind. The native stack is grown on demand, so
    /// deeply nested programs are limited only by
    /// [`EvalOptions::max_call_depth`].
    pub fn eval(&mut self, node: &Node) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_node(node))
    }

    fn eval_node(&mut self, node: &Node) -> EvalResult<Value> {
        match &node.kind {
            NodeKind::Number(n) => Ok(Value::Number(*n)),
            NodeKind::String(s) => Ok(Value::from(s.as_str())),
            NodeKind::Identifier(name) => self.eval_identifier(name, node.span),
            NodeKind::BuiltinConstant(constant) => Ok(Value::Number(constant.value())),
            NodeKind::Unary { op, operand } => {
                let value = self.eval(operand)?;
                Self::eval_unary(*op, &value, node.span)
            },
            NodeKind::Chain { first, rest } => self.eval_chain(first, rest),
            NodeKind::FunctionCall { name, args, .. } => {
                self.eval_function_call(name, args, node.span)
            },
            NodeKind::Assignment { target, op, value } => {
                self.eval_assignment(node, target, *op, value)
            },
            NodeKind::Ternary { condition,
                                if_true,
                                if_false, } => self.eval_ternary(condition, if_true, if_false),
            NodeKind::Tensor { rows } => self.eval_tensor_literal(node, rows),
            NodeKind::ForLoop { initializers,
                                condition,
                                steps,
                                body, } => self.eval_for(node, initializers, condition, steps, body),
            NodeKind::Block { statements } => self.scoped(|ctx| ctx.eval_statements(statements)),
            NodeKind::List { items } => {
                let values = self.eval_all(items)?;
                Ok(Value::from(values))
            },
            NodeKind::Indexation { target, indexes } => self.eval_indexation(node, target, indexes),
        }
    }

    /// Evaluates statements in the current frame, yielding the last value.
    ///
    /// The first error stops the sequence. An empty sequence yields
    /// [`Value::Null`].
    pub(crate) fn eval_statements(&mut self, statements: &[Statement]) -> EvalResult<Value> {
        let mut last = Value::Null;
        for statement in statements {
            last = self.eval(&statement.node)?;
        }
        Ok(last)
    }
}
