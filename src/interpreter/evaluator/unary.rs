use crate::{
    ast::{Span, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, tensor::Tensor},
    },
};

impl Context {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation for numbers, elementwise for tensors.
    /// - `Plus`: identity, numbers only.
    /// - `Transpose`: tensors of rank 1 or 2.
    ///
    /// Any other combination is a type mismatch naming the operator and the
    /// operand type.
    ///
    /// # Example
    /// ```
    /// use tensorpad::{
    ///     ast::{Span, UnaryOperator},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::Number(5.0), Span::default());
    /// assert_eq!(v.unwrap(), Value::Number(-5.0));
    ///
    /// let err = Context::eval_unary(UnaryOperator::Transpose, &Value::Number(5.0), Span::default());
    /// assert_eq!(err.unwrap_err().to_string(), "unary op ~ can't be used on NUMBER");
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, span: Span) -> EvalResult<Value> {
        match (op, value) {
            (UnaryOperator::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
            (UnaryOperator::Plus, Value::Number(n)) => Ok(Value::Number(*n)),
            (UnaryOperator::Negate, Value::Tensor(t)) => Ok(Value::from(t.map(|x| -x))),
            (UnaryOperator::Transpose, Value::Tensor(t)) => transpose(t, span).map(Value::from),
            _ => Err(RuntimeError::type_mismatch(format!("unary op {op} can't be used on {}",
                                                         value.value_type()),
                                                 span)),
        }
    }
}

/// Transposes a vector or matrix.
///
/// A rank-1 tensor `[n]` becomes the column `[n, 1]`; a matrix `[h, w]`
/// becomes `[w, h]`.
///
/// # Errors
/// [`RuntimeError::ShapeMismatch`] for tensors of rank 3 or more.
pub fn transpose(tensor: &Tensor, span: Span) -> EvalResult<Tensor> {
    let (h, w) = match tensor.shape() {
        [n] => (*n, 1),
        [h, w] => (*h, *w),
        _ => {
            return Err(RuntimeError::shape_mismatch("transposing is only defined on matrices and vectors at the moment (tensors with 1 or 2 shape components)",
                                                    span));
        },
    };

    let source = tensor.data();
    let mut data = vec![0.0; source.len()];
    for row in 0..h {
        for col in 0..w {
            data[col * h + row] = source[row * w + col];
        }
    }

    let shape = if tensor.rank() == 1 { vec![h, 1] } else { vec![w, h] };
    Tensor::new(shape, data).ok_or_else(|| {
                                RuntimeError::shape_mismatch(format!("could not transpose a tensor of shape {}",
                                                                     tensor.shape_string()),
                                                             span)
                            })
}
