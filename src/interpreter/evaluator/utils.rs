use crate::{
    ast::{Node, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, tensor::Tensor},
    },
    util::num::format_number,
};

/// Message for conditions that are not numbers.
const CONDITION_MESSAGE: &str =
    "condition needs to be a number, anything less than 0.5 is false, anything >= 0.5 is true";

impl Context {
    /// Runs `f` inside a fresh innermost frame.
    ///
    /// The frame is popped when `f` returns, whether it succeeded or not.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push_frame();
        let result = f(self);
        self.scopes.pop_frame();
        result
    }

    /// Looks up a variable by name.
    ///
    /// # Errors
    /// [`RuntimeError::UndeclaredVariable`] if no frame binds `name`.
    pub fn eval_identifier(&self, name: &str, span: Span) -> EvalResult<Value> {
        self.scopes
            .get(name)
            .ok_or_else(|| RuntimeError::UndeclaredVariable { name: name.to_string(),
                                                              span })
    }

    /// Evaluates expressions left to right, stopping at the first error.
    pub(crate) fn eval_all(&mut self, nodes: &[Node]) -> EvalResult<Vec<Value>> {
        nodes.iter().map(|node| self.eval(node)).collect()
    }

    /// Evaluates a condition: a number where `>= 0.5` means true.
    pub(crate) fn eval_condition(&mut self, condition: &Node) -> EvalResult<bool> {
        match self.eval(condition)? {
            Value::Number(n) => Ok(n >= 0.5),
            _ => Err(RuntimeError::type_mismatch(CONDITION_MESSAGE, condition.span)),
        }
    }

    /// Evaluates `condition ? if_true : if_false`. Only the taken branch is
    /// evaluated.
    pub(crate) fn eval_ternary(&mut self,
                               condition: &Node,
                               if_true: &Node,
                               if_false: &Node)
                               -> EvalResult<Value> {
        if self.eval_condition(condition)? {
            self.eval(if_true)
        } else {
            self.eval(if_false)
        }
    }

    /// Evaluates a tensor literal.
    ///
    /// Elements may be numbers or tensors, nested literals included. All
    /// elements of one literal must be of the same kind and shape; the result
    /// has shape `[element count, ...element shape]`.
    ///
    /// # Errors
    /// - Empty literals.
    /// - Elements that are neither numbers nor tensors.
    /// - Elements whose shapes differ.
    pub(crate) fn eval_tensor_literal(&mut self, node: &Node, rows: &[Node]) -> EvalResult<Value> {
        if rows.is_empty() {
            return Err(RuntimeError::invalid_argument("can't have a zero-length vector",
                                                      node.span));
        }

        let mut element_shape: Option<Vec<usize>> = None;
        let mut data = Vec::new();

        for row in rows {
            let (shape, values) = match self.eval(row)? {
                Value::Number(n) => (Vec::new(), vec![n]),
                Value::Tensor(t) => (t.shape().to_vec(), t.data().to_vec()),
                other => {
                    return Err(RuntimeError::type_mismatch(format!("bottom level item {} in tensor not of correct type - {}",
                                                                   self.text(row.span),
                                                                   other.value_type()),
                                                           row.span));
                },
            };

            match &element_shape {
                Some(expected) if *expected != shape => {
                    return Err(RuntimeError::shape_mismatch(format!("one of the elements of the tensor was the wrong size: {}",
                                                                    self.text(row.span)),
                                                            row.span));
                },
                Some(_) => {},
                None => element_shape = Some(shape),
            }
            data.extend(values);
        }

        let mut shape = vec![rows.len()];
        shape.extend(element_shape.unwrap_or_default());

        Tensor::new(shape, data).map(Value::from)
                                .ok_or_else(|| {
                                    RuntimeError::invalid_argument("can't have a zero-length vector",
                                                                   node.span)
                                })
    }
}

/// Extracts a number argument for a builtin.
///
/// # Errors
/// [`RuntimeError::TypeMismatch`] naming the function, the argument position
/// and both types.
pub fn expect_number(args: &[Value], index: usize, function: &str, span: Span) -> EvalResult<f64> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(RuntimeError::type_mismatch(format!("Argument {index} to function {function} was of type {}, but it wants NUMBER",
                                                               other.value_type()),
                                                       span)),
        None => Err(RuntimeError::ArityMismatch { details: format!("function {function} is missing argument {index}"),
                                                  span }),
    }
}

/// Extracts a tensor argument for a builtin.
///
/// # Errors
/// [`RuntimeError::TypeMismatch`] when the argument is not a tensor.
pub fn expect_tensor<'a>(args: &'a [Value],
                         index: usize,
                         function: &str,
                         span: Span)
                         -> EvalResult<&'a Tensor> {
    match args.get(index) {
        Some(Value::Tensor(t)) => Ok(t),
        Some(other) => Err(RuntimeError::type_mismatch(format!("Argument {index} to function {function} was of type {}, but it wants TENSOR",
                                                               other.value_type()),
                                                       span)),
        None => Err(RuntimeError::ArityMismatch { details: format!("function {function} is missing argument {index}"),
                                                  span }),
    }
}

/// Converts a number that is used as a count or dimension.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] unless `value` is a positive whole
/// number.
pub fn positive_count(value: f64, what: &str, span: Span) -> EvalResult<usize> {
    crate::util::num::f64_to_index(value).filter(|&n| n > 0)
                                         .ok_or_else(|| {
                                             RuntimeError::invalid_argument(format!("{what} must be a positive whole number, got {}",
                                                                                    format_number(value)),
                                                                            span)
                                         })
}
