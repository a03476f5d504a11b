use std::rc::Rc;

use tracing::trace;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalOptions},
            function::builtin::lerp_clamped,
        },
        value::{core::Value, function::Function},
    },
    util::num::usize_to_f64,
};

/// Samples a graphed function over `[start, end]`.
///
/// The domain is cut into `subdivisions + 2` equal steps and the function is
/// evaluated at every step boundary, both ends included. Each sample runs in
/// a fresh context that only knows the function itself and what it
/// captured, so sampling never touches the program that produced the graph.
///
/// # Errors
/// The first error raised by the function, or a
/// [`RuntimeError::TypeMismatch`] when it returns something other than a
/// number.
///
/// # Example
/// ```
/// use tensorpad::{
///     interpreter::evaluator::{function::output::OutputRecord, graph::sample_graph},
///     run,
/// };
///
/// let context = run("offset := 1; f(x) := x * 2 + offset; graph(f, 0, 1)");
/// let OutputRecord::Graph { functions, domain_start, domain_end } = &context.results[0] else {
///     panic!("expected a graph");
/// };
///
/// let points = sample_graph(&functions[0], *domain_start, *domain_end, 2).unwrap();
/// assert_eq!(points.len(), 5);
/// assert_eq!(points[0], (0.0, 1.0));
/// assert_eq!(points[4], (1.0, 3.0));
/// ```
pub fn sample_graph(function: &Rc<Function>,
                    start: f64,
                    end: f64,
                    subdivisions: usize)
                    -> Result<Vec<(f64, f64)>, RuntimeError> {
    let span = function.body.span;
    let mut ctx = Context::new(&function.source, EvalOptions::default());
    ctx.scopes
       .declare(&function.name, Value::Function(Rc::clone(function)))
       .map_err(|existing| RuntimeError::RedeclaredVariable { name: function.name.clone(),
                                                             existing: existing.to_string(),
                                                             span })?;

    let steps = subdivisions + 2;
    let mut points = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let x = lerp_clamped(start, end, usize_to_f64(i) / usize_to_f64(steps));
        match ctx.invoke(function, vec![Value::Number(x)], span)? {
            Value::Number(y) => points.push((x, y)),
            other => {
                return Err(RuntimeError::type_mismatch(format!("graphed function {} returned {} instead of a NUMBER",
                                                               function.name,
                                                               other.value_type()),
                                                       span));
            },
        }
    }

    trace!(function = %function.name, samples = points.len(), "sampled graph");
    Ok(points)
}

/// Samples every function of a graph, one point list per function.
///
/// # Errors
/// The first error from [`sample_graph`].
pub fn sample_all(functions: &[Rc<Function>],
                  start: f64,
                  end: f64,
                  subdivisions: usize)
                  -> Result<Vec<Vec<(f64, f64)>>, RuntimeError> {
    functions.iter()
             .map(|function| sample_graph(function, start, end, subdivisions))
             .collect()
}
