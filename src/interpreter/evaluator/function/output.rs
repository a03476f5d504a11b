use std::{fmt, rc::Rc};

use tracing::debug;

use crate::{
    ast::{Node, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::expect_number,
        },
        value::{core::Value, function::Function, tensor::Tensor},
    },
};

/// Something a program asked to show, in the order it was asked.
///
/// Records are collected in [`Context::results`] and are rendered after the
/// run finishes.
#[derive(Debug, Clone)]
pub enum OutputRecord {
    /// A value from `print`, optionally titled.
    Print {
        /// The explicit title, or the name of the printed variable.
        title: Option<String>,
        /// The printed value.
        value: Value,
    },
    /// One or more single-argument functions to draw over a domain.
    Graph {
        /// The functions, in argument order.
        functions:    Vec<Rc<Function>>,
        /// First `x` of the domain.
        domain_start: f64,
        /// Last `x` of the domain.
        domain_end:   f64,
    },
    /// Lists of 2D points to scatter.
    Plot {
        /// Tensors of shape `Nx2`, one per series.
        point_lists: Vec<Rc<Tensor>>,
    },
}

/// The kind of an [`OutputRecord`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// `print`
    Print,
    /// `graph`
    Graph,
    /// `plot`
    Plot,
}

impl OutputRecord {
    /// Returns the kind of the record.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Print { .. } => OutputKind::Print,
            Self::Graph { .. } => OutputKind::Graph,
            Self::Plot { .. } => OutputKind::Plot,
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Print => write!(f, "print"),
            Self::Graph => write!(f, "graph"),
            Self::Plot => write!(f, "plot"),
        }
    }
}

/// `print(value)` or `print(value, title)`.
///
/// Without a title, printing a plain variable uses the variable's name.
pub fn print(ctx: &mut Context, args: &[Value], nodes: &[Node], _span: Span) -> EvalResult<Value> {
    let value = args.first().cloned().unwrap_or(Value::Null);
    let title = match args.get(1) {
        Some(title) => Some(title.to_string()),
        None => nodes.first().and_then(Node::as_identifier).map(str::to_string),
    };

    debug!(title = ?title, kind = %value.value_type(), "print");
    ctx.results.push(OutputRecord::Print { title, value });

    Ok(Value::Null)
}

/// Spreads list arguments into the argument list.
fn flatten(args: &[Value]) -> Vec<Value> {
    let mut flat = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Value::List(items) => flat.extend(items.borrow().iter().cloned()),
            other => flat.push(other.clone()),
        }
    }
    flat
}

/// `graph(f, g, ..., start, end)`.
///
/// The leading functions may also be passed as a list. Every function must
/// take exactly one argument.
///
/// # Example
/// ```
/// use tensorpad::{interpreter::evaluator::function::output::OutputRecord, run};
///
/// let context = run("f(x) := x * x; graph(f, -1, 1)");
/// assert!(context.errors.is_empty());
///
/// let [OutputRecord::Graph { functions, domain_start, domain_end }] = context.results.as_slice() else {
///     panic!("expected one graph record");
/// };
/// assert_eq!(functions.len(), 1);
/// assert_eq!((*domain_start, *domain_end), (-1.0, 1.0));
/// ```
pub fn graph(ctx: &mut Context, args: &[Value], _nodes: &[Node], span: Span) -> EvalResult<Value> {
    let args = flatten(args);

    let mut functions = Vec::new();
    for arg in &args {
        let Value::Function(function) = arg else {
            break;
        };
        if function.arity() != 1 {
            return Err(RuntimeError::invalid_argument("a function can only have 1 argument to be graphable, for now at least",
                                                      span));
        }
        functions.push(Rc::clone(function));
    }

    if functions.is_empty() {
        return Err(RuntimeError::invalid_argument("arguments to graph are like ...functions, domainStart, domainEnd",
                                                  span));
    }

    let bounds = &args[functions.len()..];
    if bounds.len() != 2 {
        return Err(RuntimeError::invalid_argument("specify the start and end after the list of functions. eg: graph(f(x) := x, 0, 1)",
                                                  span));
    }
    let domain_start = expect_number(bounds, 0, "graph", span)?;
    let domain_end = expect_number(bounds, 1, "graph", span)?;

    debug!(functions = functions.len(), domain_start, domain_end, "graph");
    ctx.results.push(OutputRecord::Graph { functions,
                                           domain_start,
                                           domain_end });

    Ok(Value::Null)
}

/// `plot(points, ...)`: scatters one or more `Nx2` tensors.
pub fn plot(ctx: &mut Context, args: &[Value], _nodes: &[Node], span: Span) -> EvalResult<Value> {
    let point_lists = flatten(args).into_iter()
                                   .map(|arg| match arg {
                                       Value::Tensor(t) if t.rank() == 2 && t.shape()[1] == 2 => Ok(t),
                                       _ => Err(RuntimeError::type_mismatch("can only plot lists of 2D vectors",
                                                                            span)),
                                   })
                                   .collect::<EvalResult<Vec<_>>>()?;

    debug!(series = point_lists.len(), "plot");
    ctx.results.push(OutputRecord::Plot { point_lists });

    Ok(Value::Null)
}
